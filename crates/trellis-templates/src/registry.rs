//! Template registry and whole-registry validation

use crate::error::{TemplateError, TemplateResult};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};
use trellis_domain::template::normalize_template_name;
use trellis_domain::vocab::ottr;
use trellis_domain::{Argument, Instance, Template};

/// Named template definitions, open for registration
///
/// The primitive `ottr:Triple` template is always known and cannot be
/// replaced. Call [`TemplateRegistry::validate`] once, before any row is
/// processed, to obtain the immutable [`ValidatedRegistry`].
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
    order: Vec<String>,
    primitive: Template,
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRegistry {
    /// Create a registry holding only the primitive triple template
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
            order: Vec::new(),
            primitive: Template::triple_primitive(),
        }
    }

    /// Build a registry from templates, failing on the first duplicate
    pub fn from_templates<I>(templates: I) -> TemplateResult<Self>
    where
        I: IntoIterator<Item = Template>,
    {
        let mut registry = Self::new();
        for template in templates {
            registry.register(template)?;
        }
        Ok(registry)
    }

    /// Register a template
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::DuplicateTemplate`] if the name is taken,
    /// including by the primitive triple template.
    pub fn register(&mut self, template: Template) -> TemplateResult<()> {
        if template.name == ottr::TRIPLE || self.templates.contains_key(&template.name) {
            return Err(TemplateError::DuplicateTemplate(template.name));
        }
        debug!("Registered template {}", template.name);
        self.order.push(template.name.clone());
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    /// Look up a template by name
    pub fn lookup(&self, name: &str) -> TemplateResult<&Template> {
        lookup_in(&self.templates, &self.primitive, name)
    }

    /// Number of registered templates (the primitive excluded)
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template has been registered
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Validate the whole registry
    ///
    /// Checks, for every template: unique parameter names, that every
    /// referenced template exists, that every instance supplies exactly the
    /// callee's arity, that every variable names a parameter, and that the
    /// reference graph is acyclic. Never touches row data.
    pub fn validate(self) -> TemplateResult<ValidatedRegistry> {
        for name in &self.order {
            let template = &self.templates[name];
            self.check_parameters(template)?;
            for instance in &template.body {
                self.check_instance(template, instance, false)?;
            }
        }

        let post_order = self.post_order()?;

        info!(
            "Validated {} template(s), {} base",
            self.templates.len(),
            self.templates.values().filter(|t| t.is_base()).count()
        );

        Ok(ValidatedRegistry {
            templates: self.templates,
            post_order,
            primitive: self.primitive,
        })
    }

    fn check_parameters(&self, template: &Template) -> TemplateResult<()> {
        let mut seen = HashSet::new();
        for parameter in &template.parameters {
            if !seen.insert(parameter.name.as_str()) {
                return Err(TemplateError::DuplicateParameter {
                    template: template.name.clone(),
                    parameter: parameter.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_instance(&self, caller: &Template, instance: &Instance, nested: bool) -> TemplateResult<()> {
        let callee = self.lookup(&instance.template)?;

        if callee.arity() != instance.arguments.len() {
            return Err(TemplateError::ArityMismatch {
                caller: caller.name.clone(),
                callee: callee.name.clone(),
                expected: callee.arity(),
                found: instance.arguments.len(),
            });
        }

        if nested && instance.arguments.is_empty() {
            return Err(TemplateError::EmptyNestedInstance {
                template: caller.name.clone(),
                callee: callee.name.clone(),
            });
        }

        for argument in &instance.arguments {
            match argument {
                Argument::Constant(_) => {}
                Argument::Variable(name) => {
                    if caller.parameter_index(name).is_none() {
                        return Err(TemplateError::UnboundVariable {
                            template: caller.name.clone(),
                            variable: name.clone(),
                        });
                    }
                }
                Argument::Nested(inner) => self.check_instance(caller, inner, true)?,
            }
        }
        Ok(())
    }

    /// Distinct non-primitive templates referenced by `name`, in body order
    fn callees<'a>(&'a self, name: &str) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        let Some(template) = self.templates.get(name) else {
            return Vec::new();
        };
        template
            .references()
            .into_iter()
            .filter(|callee| *callee != ottr::TRIPLE && seen.insert(*callee))
            .collect()
    }

    /// Depth-first walk with in-progress marking; callees precede callers
    fn post_order(&self) -> TemplateResult<Vec<String>> {
        struct Frame<'a> {
            name: &'a str,
            callees: Vec<&'a str>,
            next: usize,
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut order = Vec::with_capacity(self.templates.len());

        for root in &self.order {
            if marks.contains_key(root.as_str()) {
                continue;
            }
            marks.insert(root.as_str(), Mark::InProgress);
            let mut stack = vec![Frame {
                name: root.as_str(),
                callees: self.callees(root),
                next: 0,
            }];

            loop {
                let Some(frame) = stack.last_mut() else {
                    break;
                };

                if frame.next < frame.callees.len() {
                    let callee = frame.callees[frame.next];
                    frame.next += 1;

                    match marks.get(callee) {
                        Some(Mark::Done) => {}
                        Some(Mark::InProgress) => {
                            let start = stack.iter().position(|f| f.name == callee).unwrap_or(0);
                            let mut cycle: Vec<String> =
                                stack[start..].iter().map(|f| f.name.to_string()).collect();
                            cycle.push(callee.to_string());
                            return Err(TemplateError::CyclicTemplate { cycle });
                        }
                        None => {
                            marks.insert(callee, Mark::InProgress);
                            stack.push(Frame {
                                name: callee,
                                callees: self.callees(callee),
                                next: 0,
                            });
                        }
                    }
                } else {
                    let name = frame.name;
                    stack.pop();
                    marks.insert(name, Mark::Done);
                    order.push(name.to_string());
                }
            }
        }

        Ok(order)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

fn lookup_in<'a>(
    templates: &'a HashMap<String, Template>,
    primitive: &'a Template,
    name: &str,
) -> TemplateResult<&'a Template> {
    let name = normalize_template_name(name.to_string());
    if name == ottr::TRIPLE {
        return Ok(primitive);
    }
    templates
        .get(&name)
        .ok_or(TemplateError::TemplateNotFound(name))
}

/// A registry that passed validation; immutable from here on
#[derive(Debug, Clone)]
pub struct ValidatedRegistry {
    templates: HashMap<String, Template>,
    post_order: Vec<String>,
    primitive: Template,
}

impl ValidatedRegistry {
    /// Look up a template by name
    pub fn lookup(&self, name: &str) -> TemplateResult<&Template> {
        lookup_in(&self.templates, &self.primitive, name)
    }

    /// Template names ordered so that every callee precedes its callers
    pub fn post_order(&self) -> &[String] {
        &self.post_order
    }

    /// Number of templates (the primitive excluded)
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the registry holds no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
