use crate::{
    compiler::CodecRegistry,
    declaration::{Declaration, BYTE},
    error::SchemaError,
};
use std::collections::{HashMap, HashSet};

/// Checks declarations before compilation, stopping at the first violation.
///
/// The checks run in this order:
///
/// 1. declaration names are unique;
/// 2. field names are unique within each struct and table;
/// 3. every referenced name is declared or found in `refs`;
/// 4. union ids fit a `u32` and are unique within their union;
/// 5. arrays and structs are fixed-size all the way down, without cycles.
pub fn validate(
    declarations: &[Declaration],
    refs: Option<&CodecRegistry>,
) -> Result<(), SchemaError> {
    check_duplicate_names(declarations)?;
    check_duplicate_fields(declarations)?;

    let by_name: HashMap<&str, &Declaration> = declarations
        .iter()
        .map(|declaration| (declaration.name(), declaration))
        .collect();
    let known = |name: &str| {
        name == BYTE || by_name.contains_key(name) || refs.is_some_and(|refs| refs.contains(name))
    };

    for declaration in declarations {
        if let Some(missing) = declaration
            .references()
            .into_iter()
            .find(|name| !known(*name))
        {
            return Err(SchemaError::DependencyNotFound {
                dependency: missing.to_owned(),
                kind: declaration.kind(),
                declaration: declaration.name().to_owned(),
            });
        }
    }

    for declaration in declarations {
        if let Declaration::Union { name, items } = declaration {
            let mut ids = HashSet::new();
            for (index, item) in items.iter().enumerate() {
                let id = item.explicit_id().unwrap_or(index as u64);
                let id = u32::try_from(id).map_err(|_| SchemaError::UnionIdOverflow {
                    declaration: name.clone(),
                    item: item.name().to_owned(),
                    id,
                })?;
                if !ids.insert(id) {
                    return Err(SchemaError::DuplicateUnionId {
                        declaration: name.clone(),
                        id,
                    });
                }
            }
        }
    }

    let checker = FixedSizeChecker { by_name, refs };
    for declaration in declarations.iter().filter(|d| d.is_fixed_kind()) {
        checker.assert_fixed(declaration, &mut Vec::new())?;
    }
    Ok(())
}

fn check_duplicate_names(declarations: &[Declaration]) -> Result<(), SchemaError> {
    let mut names = HashSet::new();
    for declaration in declarations {
        if !names.insert(declaration.name()) {
            return Err(SchemaError::DuplicateName(declaration.name().to_owned()));
        }
    }
    Ok(())
}

fn check_duplicate_fields(declarations: &[Declaration]) -> Result<(), SchemaError> {
    for declaration in declarations {
        let fields = match declaration {
            Declaration::Struct { fields, .. } | Declaration::Table { fields, .. } => fields,
            _ => continue,
        };
        let mut names = HashSet::new();
        for field in fields {
            if !names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    declaration: declaration.name().to_owned(),
                    field: field.name.clone(),
                });
            }
        }
    }
    Ok(())
}

struct FixedSizeChecker<'a> {
    by_name: HashMap<&'a str, &'a Declaration>,
    refs: Option<&'a CodecRegistry>,
}

impl<'a> FixedSizeChecker<'a> {
    // `path` holds the declarations currently being checked, outermost first.
    fn assert_fixed(
        &self,
        declaration: &'a Declaration,
        path: &mut Vec<&'a str>,
    ) -> Result<(), SchemaError> {
        let name = declaration.name();
        if !declaration.is_fixed_kind() {
            return Err(SchemaError::NotFixedLength {
                kind: declaration.kind(),
                name: name.to_owned(),
            });
        }
        if let Some(start) = path.iter().position(|visiting| *visiting == name) {
            let mut cycle: Vec<String> = path[start..].iter().map(|n| (*n).to_owned()).collect();
            cycle.push(name.to_owned());
            return Err(SchemaError::CircularDependency(cycle));
        }

        path.push(name);
        for dependency in declaration.references() {
            if dependency == BYTE {
                continue;
            }
            match self.by_name.get(dependency) {
                Some(inner) => self.assert_fixed(*inner, path)?,
                None => self.assert_fixed_ref(dependency, declaration)?,
            }
        }
        path.pop();
        Ok(())
    }

    fn assert_fixed_ref(&self, dependency: &str, owner: &Declaration) -> Result<(), SchemaError> {
        match self.refs.and_then(|refs| refs.get(dependency)) {
            Some(codec) if codec.is_fixed() => Ok(()),
            Some(_) => Err(SchemaError::DependencyNotFixed {
                dependency: dependency.to_owned(),
                kind: owner.kind(),
                declaration: owner.name().to_owned(),
            }),
            None => Err(SchemaError::DependencyNotFound {
                dependency: dependency.to_owned(),
                kind: owner.kind(),
                declaration: owner.name().to_owned(),
            }),
        }
    }
}
