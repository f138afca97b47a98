//! Name classes: the sets of qualified names an attribute or element may
//! carry.
//!
//! Only concrete names produce writer members. Wildcards (`anyName`,
//! `nsName`) describe infinite sets and contribute nothing to
//! [`NameClass::list_names`].

use std::fmt;

use rngscribe_foundation::{Error, Location, QName, Result};

/// A set of qualified names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameClass {
    /// Exactly one name.
    Name(QName),
    /// Any name, optionally minus an exception.
    AnyName {
        /// Names excluded from the set.
        except: Option<Box<NameClass>>,
    },
    /// Any name in a namespace, optionally minus an exception.
    NsName {
        /// The namespace URI.
        namespace: String,
        /// Names excluded from the set.
        except: Option<Box<NameClass>>,
    },
    /// The union of several name classes.
    Choice(Vec<NameClass>),
}

impl NameClass {
    /// Returns the concrete names in this class, in declaration order and
    /// without duplicates.
    #[must_use]
    pub fn list_names(&self) -> Vec<QName> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, out: &mut Vec<QName>) {
        match self {
            Self::Name(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            Self::Choice(choices) => {
                for choice in choices {
                    choice.collect_names(out);
                }
            }
            Self::AnyName { .. } | Self::NsName { .. } => {}
        }
    }

    /// Returns true if `name` belongs to this class.
    #[must_use]
    pub fn contains(&self, name: &QName) -> bool {
        match self {
            Self::Name(n) => n == name,
            Self::AnyName { except } => !except.as_ref().is_some_and(|e| e.contains(name)),
            Self::NsName { namespace, except } => {
                &name.namespace == namespace && !except.as_ref().is_some_and(|e| e.contains(name))
            }
            Self::Choice(choices) => choices.iter().any(|c| c.contains(name)),
        }
    }

    /// Returns true if the class has no wildcards.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Name(_) => true,
            Self::AnyName { .. } | Self::NsName { .. } => false,
            Self::Choice(choices) => choices.iter().all(NameClass::is_finite),
        }
    }
}

impl fmt::Display for NameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::AnyName { except: None } => write!(f, "*"),
            Self::AnyName { except: Some(e) } => write!(f, "* - ({e})"),
            Self::NsName {
                namespace,
                except: None,
            } => write!(f, "{{{namespace}}}*"),
            Self::NsName {
                namespace,
                except: Some(e),
            } => write!(f, "{{{namespace}}}* - ({e})"),
            Self::Choice(choices) => {
                let parts: Vec<String> = choices.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" | "))
            }
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builds name classes on behalf of the grammar parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameClassBuilder;

impl NameClassBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// A single name.
    #[must_use]
    pub fn make_name(&self, namespace: &str, local: &str) -> NameClass {
        NameClass::Name(QName::new(namespace, local))
    }

    /// Every name in a namespace.
    #[must_use]
    pub fn make_ns_name(&self, namespace: &str) -> NameClass {
        NameClass::NsName {
            namespace: namespace.to_string(),
            except: None,
        }
    }

    /// Every name in a namespace except those in `except`.
    #[must_use]
    pub fn make_ns_name_except(&self, namespace: &str, except: NameClass) -> NameClass {
        NameClass::NsName {
            namespace: namespace.to_string(),
            except: Some(Box::new(except)),
        }
    }

    /// Every name.
    #[must_use]
    pub fn make_any_name(&self) -> NameClass {
        NameClass::AnyName { except: None }
    }

    /// Every name except those in `except`.
    #[must_use]
    pub fn make_any_name_except(&self, except: NameClass) -> NameClass {
        NameClass::AnyName {
            except: Some(Box::new(except)),
        }
    }

    /// The union of `choices`. A single choice is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns a schema build error if `choices` is empty.
    pub fn make_choice(
        &self,
        mut choices: Vec<NameClass>,
        location: Option<&Location>,
    ) -> Result<NameClass> {
        match choices.len() {
            0 => Err(Error::schema_build(
                "name class choice has no alternatives",
                location.cloned(),
            )),
            1 => Ok(choices.remove(0)),
            _ => Ok(NameClass::Choice(choices)),
        }
    }

    /// Stand-in for a name class the parser could not read. Contains no
    /// names.
    #[must_use]
    pub fn make_error_name_class(&self) -> NameClass {
        NameClass::Choice(Vec::new())
    }
}
