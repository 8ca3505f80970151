//! Metadata model — plain data structures describing an assembly's types and
//! members, supplied by the caller in place of runtime reflection.
//!
//! Generic parameter names are declared per nesting level; absolute
//! placeholder positions (the XML schema numbers type parameters across the
//! whole nesting chain) are computed at render time.

/// Everything the generator knows about the world: one or more assemblies.
#[derive(Debug, Default)]
pub struct Metadata {
    pub assemblies: Vec<AssemblyDef>,
}

impl Metadata {
    pub fn new(assemblies: Vec<AssemblyDef>) -> Self {
        Metadata { assemblies }
    }

    /// Find a top-level type by its namespace-qualified name and generic
    /// arity, together with the assembly declaring it.
    pub fn find_type(&self, qualified_name: &str, arity: usize) -> Option<(&AssemblyDef, &TypeDef)> {
        for assembly in &self.assemblies {
            for ty in &assembly.types {
                if ty.qualified_name() == qualified_name && ty.generic_params.len() == arity {
                    return Some((assembly, ty));
                }
            }
        }
        None
    }
}

#[derive(Debug, Default)]
pub struct AssemblyDef {
    pub name: String,
    pub types: Vec<TypeDef>,
}

impl AssemblyDef {
    pub fn new(name: &str) -> Self {
        AssemblyDef {
            name: name.to_string(),
            types: Vec::new(),
        }
    }

    pub fn with_type(mut self, ty: TypeDef) -> Self {
        self.types.push(ty);
        self
    }
}

/// A type declaration. `namespace` is empty for nested types; `name` carries
/// no arity suffix (arity is `generic_params.len()`).
#[derive(Debug, Default)]
pub struct TypeDef {
    pub namespace: String,
    pub name: String,
    /// Generic parameter names declared at this nesting level only.
    pub generic_params: Vec<String>,
    pub nested: Vec<TypeDef>,
    pub constructors: Vec<MethodDef>,
    pub methods: Vec<MethodDef>,
    pub properties: Vec<PropertyDef>,
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    pub fn new(namespace: &str, name: &str) -> Self {
        TypeDef {
            namespace: namespace.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn generic(namespace: &str, name: &str, params: &[&str]) -> Self {
        TypeDef {
            generic_params: params.iter().map(|p| p.to_string()).collect(),
            ..TypeDef::new(namespace, name)
        }
    }

    /// Nested type declaration (namespace stays empty).
    pub fn nested(name: &str, params: &[&str]) -> Self {
        TypeDef::generic("", name, params)
    }

    pub fn with_nested(mut self, ty: TypeDef) -> Self {
        self.nested.push(ty);
        self
    }

    pub fn with_ctor(mut self, ctor: MethodDef) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_property(mut self, name: &str) -> Self {
        self.properties.push(PropertyDef {
            name: name.to_string(),
        });
        self
    }

    pub fn with_field(mut self, name: &str) -> Self {
        self.fields.push(FieldDef {
            name: name.to_string(),
        });
        self
    }

    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn find_nested(&self, name: &str, arity: usize) -> Option<&TypeDef> {
        self.nested
            .iter()
            .find(|t| t.name == name && t.generic_params.len() == arity)
    }
}

/// A method or constructor declaration. Constructors have an empty `name`
/// by convention (they are addressed structurally, never by name).
#[derive(Debug, Clone, Default)]
pub struct MethodDef {
    pub name: String,
    /// The method's own generic parameter names.
    pub generic_params: Vec<String>,
    pub parameters: Vec<ParameterDef>,
    pub is_static: bool,
}

impl MethodDef {
    pub fn new(name: &str) -> Self {
        MethodDef {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn generic(name: &str, params: &[&str]) -> Self {
        MethodDef {
            generic_params: params.iter().map(|p| p.to_string()).collect(),
            ..MethodDef::new(name)
        }
    }

    pub fn ctor() -> Self {
        MethodDef::default()
    }

    pub fn with_param(mut self, name: &str, ty: TypeUse) -> Self {
        self.parameters.push(ParameterDef {
            name: name.to_string(),
            ty,
        });
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ParameterDef {
    pub name: String,
    pub ty: TypeUse,
}

#[derive(Debug, Clone)]
pub struct PropertyDef {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
}

/// A type as it appears inside a signature: either a (possibly generic)
/// named type or a reference to a generic parameter by its declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeUse {
    Named { name: String, args: Vec<TypeUse> },
    Param(String),
}

impl TypeUse {
    pub fn named(name: &str) -> Self {
        TypeUse::Named {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: &str, args: Vec<TypeUse>) -> Self {
        TypeUse::Named {
            name: name.to_string(),
            args,
        }
    }

    pub fn param(name: &str) -> Self {
        TypeUse::Param(name.to_string())
    }
}

/// A reference to a (possibly nested, possibly closed-generic) type. The
/// outermost segment's name is namespace-qualified; nested segments use the
/// bare type name. Segment `args` are the closed type arguments.
#[derive(Debug, Clone)]
pub struct TypeRef {
    pub path: Vec<TypeSegment>,
}

#[derive(Debug, Clone)]
pub struct TypeSegment {
    pub name: String,
    pub args: Vec<TypeUse>,
}

impl TypeRef {
    pub fn new(qualified_name: &str) -> Self {
        TypeRef::generic(qualified_name, Vec::new())
    }

    pub fn generic(qualified_name: &str, args: Vec<TypeUse>) -> Self {
        TypeRef {
            path: vec![TypeSegment {
                name: qualified_name.to_string(),
                args,
            }],
        }
    }

    pub fn nested(self, name: &str) -> Self {
        self.nested_generic(name, Vec::new())
    }

    pub fn nested_generic(mut self, name: &str, args: Vec<TypeUse>) -> Self {
        self.path.push(TypeSegment {
            name: name.to_string(),
            args,
        });
        self
    }
}
