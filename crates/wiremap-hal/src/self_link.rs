//! Self links as object identity
//!
//! A resource's self link both names it and carries its identifying
//! attributes. [`SelfLinkMapper`] converts a whole domain object to its self
//! link and back, which is what makes linked and embedded resources
//! resolvable: any place holding a link to a resource can reconstruct the
//! identified object from the href alone.

use wiremap_core::accessor::{Accessor, Attributes};
use wiremap_core::factory::SharedFactory;
use wiremap_core::mapper::{BoxMapper, Mapper};
use wiremap_core::{Context, Error, ErrorKind, Failure, Options, Outcome};
use wiremap_value::Value;

use crate::link::{LinkMapper, LinkParams};

/// Converts a domain object to its self link and back
///
/// Writing derives the template parameters from the object and expands them
/// into a link; reading extracts the parameters out of the href and builds
/// an object carrying them.
pub struct SelfLinkMapper<S> {
    params: BoxMapper<S, LinkParams>,
    link: LinkMapper,
}

impl<S> SelfLinkMapper<S> {
    /// Create a self link mapper from a params mapper and a link mapper
    pub fn new(params: impl Mapper<S, LinkParams> + Send + Sync + 'static, link: LinkMapper) -> Self
    where
        S: 'static,
    {
        SelfLinkMapper {
            params: Box::new(params),
            link,
        }
    }
}

impl<S> Mapper<S, Value> for SelfLinkMapper<S> {
    fn read(&self, value: &Value, options: &Options, context: &Context) -> Outcome<S> {
        let params = self.link.read(value, options, context)?;

        self.params.read(&params, options, context)
    }

    fn write(&self, value: &S, options: &Options, context: &Context) -> Outcome<Value> {
        let params = self.params.write(value, options, context)?;

        self.link.write(&params, options, context)
    }
}

fn collect_params<S: Attributes>(object: &S, names: &[String]) -> Outcome<LinkParams> {
    let mut params = LinkParams::new();
    let mut failure = Failure::empty();

    for name in names {
        match object.get_attr(name) {
            Some(value) => {
                params.insert(name.clone(), value);
            }
            None => failure.merge(Failure::new(Error::new(ErrorKind::MissingGetter {
                attr: name.clone(),
            }))),
        }
    }

    failure.into_outcome(params)
}

fn apply_params<S: Attributes>(object: &mut S, names: &[String], params: &LinkParams) -> Outcome<()> {
    let mut failure = Failure::empty();

    for name in names {
        if let Some(value) = params.get(name) {
            if !object.set_attr(name, value.clone()) {
                failure.merge(Failure::new(Error::new(ErrorKind::MissingSetter {
                    attr: name.clone(),
                })));
            }
        }
    }

    failure.into_outcome(())
}

/// Derives template parameters from same-named attributes
///
/// Reading instantiates a fresh object via the factory and writes the
/// parameters into its attributes. Missing getters and setters accumulate
/// instead of aborting at the first absent attribute.
pub struct TemplateParamsMapper<S> {
    names: Vec<String>,
    factory: SharedFactory<S>,
}

impl<S> TemplateParamsMapper<S> {
    /// Create a mapper for the attributes in `names`
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>, factory: SharedFactory<S>) -> Self {
        TemplateParamsMapper {
            names: names.into_iter().map(Into::into).collect(),
            factory,
        }
    }
}

impl<S: Attributes> Mapper<S, LinkParams> for TemplateParamsMapper<S> {
    fn read(&self, params: &LinkParams, _options: &Options, _context: &Context) -> Outcome<S> {
        let mut object = self.factory.create();
        apply_params(&mut object, &self.names, params)?;

        Ok(object)
    }

    fn write(&self, object: &S, _options: &Options, _context: &Context) -> Outcome<LinkParams> {
        collect_params(object, &self.names)
    }
}

/// Accesses template parameters as a group of same-named attributes
///
/// The accessor form of [`TemplateParamsMapper`]: it fills an existing
/// object instead of instantiating one, which is what a link pipe needs
/// during pull.
pub struct TemplateParamsAccessor {
    names: Vec<String>,
}

impl TemplateParamsAccessor {
    /// Create an accessor for the attributes in `names`
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        TemplateParamsAccessor {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Attributes> Accessor<S, LinkParams> for TemplateParamsAccessor {
    fn get(&self, object: &S, _options: &Options, _context: &Context) -> Outcome<LinkParams> {
        collect_params(object, &self.names)
    }

    fn set(&self, object: &mut S, params: LinkParams, _options: &Options, _context: &Context) -> Outcome<()> {
        apply_params(object, &self.names, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::UriTemplate;
    use std::sync::Arc;

    #[derive(Debug, Default, PartialEq)]
    struct Person {
        name: String,
    }

    impl Attributes for Person {
        fn get_attr(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some(Value::from(self.name.clone())),
                _ => None,
            }
        }

        fn set_attr(&mut self, name: &str, value: Value) -> bool {
            match name {
                "name" => {
                    self.name = value.as_str().unwrap_or_default().to_string();
                    true
                }
                _ => false,
            }
        }
    }

    fn call() -> (Options, Context) {
        (Options::default(), Context::default())
    }

    fn mapper() -> SelfLinkMapper<Person> {
        let template = UriTemplate::parse("/people/{name}").unwrap();
        let params = TemplateParamsMapper::new(
            template.variables().to_vec(),
            Arc::new(Person::default) as SharedFactory<Person>,
        );

        SelfLinkMapper::new(params, LinkMapper::new(template))
    }

    #[test]
    fn test_write_derives_link_from_attributes() {
        let (options, context) = call();
        let person = Person {
            name: "marten-lienen".to_string(),
        };

        assert_eq!(
            mapper().write(&person, &options, &context),
            Ok(Value::object([("href", "/people/marten-lienen")]))
        );
    }

    #[test]
    fn test_read_rebuilds_object_from_href() {
        let (options, context) = call();
        let link = Value::object([("href", "/people/marten-lienen")]);

        let person = mapper().read(&link, &options, &context).unwrap();

        assert_eq!(person.name, "marten-lienen");
    }

    #[test]
    fn test_read_rejects_foreign_href() {
        let (options, context) = call();
        let link = Value::object([("href", "/pets/5")]);

        assert_eq!(
            mapper().read(&link, &options, &context),
            Err(Failure::from(ErrorKind::InvalidLink {
                template: "/people/{name}".to_string(),
                href: "/pets/5".to_string(),
            }))
        );
    }

    #[test]
    fn test_params_accessor_fills_existing_object() {
        let (options, context) = call();
        let accessor = TemplateParamsAccessor::new(["name"]);
        let params = LinkParams::from_iter([("name".to_string(), Value::from("ronja"))]);

        let mut person = Person {
            name: "marten".to_string(),
        };
        accessor
            .set(&mut person, params.clone(), &options, &context)
            .unwrap();
        assert_eq!(person.name, "ronja");

        assert_eq!(accessor.get(&person, &options, &context), Ok(params));
    }

    #[test]
    fn test_params_mapper_accumulates_missing_getters() {
        let (options, context) = call();
        let params_mapper: TemplateParamsMapper<Person> = TemplateParamsMapper::new(
            ["name", "age", "city"],
            Arc::new(Person::default) as SharedFactory<Person>,
        );
        let person = Person {
            name: "marten".to_string(),
        };

        let result = params_mapper.write(&person, &options, &context);

        let expected = Failure::of(vec![
            Error::new(ErrorKind::MissingGetter {
                attr: "age".to_string(),
            }),
            Error::new(ErrorKind::MissingGetter {
                attr: "city".to_string(),
            }),
        ]);
        assert_eq!(result.unwrap_err(), expected);
    }
}
