//! Pre-classification pass.
//!
//! Runs over the complete fragment set before any entity exists: the
//! static/instance bucket of one interface can hinge on a variable
//! binding declared in a different fragment, so nothing may be built
//! until every fragment has been scanned.

use std::collections::{HashMap, HashSet};

use crate::ast::{Decl, Fragment, Member};

/// How an interface-like declaration contributes members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Constructor-shaped (or unbound): members belong to the object
    /// itself.
    Static,
    /// The instance half of a variable/interface pair: members belong to
    /// instances.
    Instance,
}

/// Output of the pre-classification pass.
#[derive(Debug, Default)]
pub struct Classification {
    /// Every variable name declared anywhere in the fragment set.
    var_names: HashSet<String>,
    /// Variable name -> directly-referenced named type.
    var_to_type: HashMap<String, String>,
    /// Directly-referenced named type -> variable name.
    type_to_var: HashMap<String, String>,
    /// Every interface name declared anywhere.
    interface_names: HashSet<String>,
    /// Shape bucket per interface name.
    shapes: HashMap<String, Shape>,
}

impl Classification {
    /// Scan all fragments and bucket every interface-like declaration.
    pub fn scan(fragments: &[Fragment]) -> Self {
        let mut out = Classification::default();

        for fragment in fragments {
            out.scan_decls(&fragment.decls);
        }
        for fragment in fragments {
            out.bucket_decls(&fragment.decls);
        }

        out
    }

    fn scan_decls(&mut self, decls: &[Decl]) {
        for decl in decls {
            match decl {
                Decl::Var(var) => {
                    self.var_names.insert(var.name.clone());
                    // Only a bare named reference links a variable to a
                    // type; literals and computed types do not
                    if let Some(ty_name) = var.ty.simple_name() {
                        self.var_to_type
                            .insert(var.name.clone(), ty_name.to_string());
                        self.type_to_var
                            .insert(ty_name.to_string(), var.name.clone());
                    }
                }
                Decl::Interface(iface) => {
                    self.interface_names.insert(iface.name.clone());
                }
                Decl::Namespace(ns) if !ns.ambient => {
                    self.scan_decls(&ns.decls);
                }
                _ => {}
            }
        }
    }

    fn bucket_decls(&mut self, decls: &[Decl]) {
        for decl in decls {
            match decl {
                Decl::Interface(iface) => {
                    let constructor_shaped = iface
                        .members
                        .iter()
                        .any(|m| matches!(m, Member::Construct(_) | Member::Call(_)));

                    // Constructor shape wins over a name coincidence
                    // with a variable
                    let shape = if constructor_shaped {
                        Shape::Static
                    } else if self.var_names.contains(&iface.name) {
                        Shape::Instance
                    } else {
                        Shape::Static
                    };

                    self.shapes.insert(iface.name.clone(), shape);
                }
                Decl::Namespace(ns) if !ns.ambient => {
                    self.bucket_decls(&ns.decls);
                }
                _ => {}
            }
        }
    }

    pub fn is_var(&self, name: &str) -> bool {
        self.var_names.contains(name)
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.interface_names.contains(name)
    }

    /// The named type a variable directly references, if any.
    pub fn type_of_var(&self, var: &str) -> Option<&str> {
        self.var_to_type.get(var).map(String::as_str)
    }

    /// The variable whose declared type directly references `ty`, if
    /// any.
    pub fn var_for_type(&self, ty: &str) -> Option<&str> {
        self.type_to_var.get(ty).map(String::as_str)
    }

    /// The shape bucket of an interface; interfaces never scanned
    /// default to static.
    pub fn shape_of(&self, interface: &str) -> Shape {
        self.shapes.get(interface).copied().unwrap_or(Shape::Static)
    }
}
