//! Symbol tables for referenced binaries
//!
//! The original toolchain reflected over loaded assemblies to answer
//! "does this type exist", "does it have a member with this name", and
//! "does it have a constructor with this arity". The translator core only
//! depends on that capability set, expressed as [`SymbolProvider`], so a
//! host can back it with real metadata and tests can hand in a
//! [`FixedSymbolTable`] built by hand.

use rustc_hash::FxHashMap;

/// Opaque handle to a type known to a [`SymbolProvider`]. Only valid
/// against the provider that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Property,
    Method { param_count: usize },
    Event,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    /// Declared type of a field/property, or return type of a method.
    /// None when unknown.
    pub type_name: Option<String>,
    pub is_public: bool,
    pub is_static: bool,
}

impl MemberInfo {
    pub fn field(name: impl Into<String>, type_name: &str) -> MemberInfo {
        MemberInfo {
            name: name.into(),
            kind: MemberKind::Field,
            type_name: Some(type_name.to_string()),
            is_public: true,
            is_static: false,
        }
    }

    pub fn property(name: impl Into<String>, type_name: &str) -> MemberInfo {
        MemberInfo {
            name: name.into(),
            kind: MemberKind::Property,
            type_name: Some(type_name.to_string()),
            is_public: true,
            is_static: false,
        }
    }

    pub fn method(name: impl Into<String>, param_count: usize, return_type: &str) -> MemberInfo {
        MemberInfo {
            name: name.into(),
            kind: MemberKind::Method { param_count },
            type_name: Some(return_type.to_string()),
            is_public: true,
            is_static: false,
        }
    }

    pub fn non_public(mut self) -> MemberInfo {
        self.is_public = false;
        self
    }

    pub fn static_member(mut self) -> MemberInfo {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalTypeInfo {
    pub full_name: String,
    pub base: Option<String>,
    pub interfaces: Vec<String>,
    pub is_interface: bool,
    pub is_delegate: bool,
    pub constructor_arities: Vec<usize>,
    pub members: Vec<MemberInfo>,
}

impl ExternalTypeInfo {
    pub fn class(full_name: impl Into<String>) -> ExternalTypeInfo {
        ExternalTypeInfo {
            full_name: full_name.into(),
            base: None,
            interfaces: Vec::new(),
            is_interface: false,
            is_delegate: false,
            constructor_arities: vec![0],
            members: Vec::new(),
        }
    }

    pub fn interface(full_name: impl Into<String>) -> ExternalTypeInfo {
        ExternalTypeInfo {
            is_interface: true,
            constructor_arities: Vec::new(),
            ..ExternalTypeInfo::class(full_name)
        }
    }

    pub fn delegate(full_name: impl Into<String>) -> ExternalTypeInfo {
        ExternalTypeInfo {
            is_delegate: true,
            constructor_arities: vec![2],
            ..ExternalTypeInfo::class(full_name)
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> ExternalTypeInfo {
        self.base = Some(base.into());
        self
    }

    pub fn with_interface(mut self, name: impl Into<String>) -> ExternalTypeInfo {
        self.interfaces.push(name.into());
        self
    }

    pub fn with_member(mut self, member: MemberInfo) -> ExternalTypeInfo {
        self.members.push(member);
        self
    }

    pub fn with_constructor_arity(mut self, arity: usize) -> ExternalTypeInfo {
        self.constructor_arities.push(arity);
        self
    }
}

/// The reflective capabilities the translator needs from referenced
/// binaries. Lookups that fail degrade downstream heuristics to their
/// conservative fallback; they never fail a translation by themselves.
pub trait SymbolProvider {
    fn lookup_type(&self, full_name: &str) -> Option<TypeHandle>;
    fn type_info(&self, handle: TypeHandle) -> Option<&ExternalTypeInfo>;
    fn lookup_member(&self, handle: TypeHandle, name: &str) -> Option<&MemberInfo>;
    fn constructors_with_arity(&self, handle: TypeHandle, arity: usize) -> bool;
}

/// In-memory provider over a fixed set of type descriptions. Hosts build
/// one from assembly metadata; tests build one by hand.
#[derive(Debug, Default)]
pub struct FixedSymbolTable {
    types: Vec<ExternalTypeInfo>,
    by_name: FxHashMap<String, TypeHandle>,
}

impl FixedSymbolTable {
    pub fn new() -> FixedSymbolTable {
        FixedSymbolTable::default()
    }

    pub fn add_type(&mut self, info: ExternalTypeInfo) -> TypeHandle {
        let handle = TypeHandle(self.types.len() as u32);
        self.by_name.insert(info.full_name.clone(), handle);
        self.types.push(info);
        handle
    }

    pub fn with_type(mut self, info: ExternalTypeInfo) -> FixedSymbolTable {
        self.add_type(info);
        self
    }
}

impl SymbolProvider for FixedSymbolTable {
    fn lookup_type(&self, full_name: &str) -> Option<TypeHandle> {
        self.by_name.get(full_name).copied()
    }

    fn type_info(&self, handle: TypeHandle) -> Option<&ExternalTypeInfo> {
        self.types.get(handle.0 as usize)
    }

    fn lookup_member(&self, handle: TypeHandle, name: &str) -> Option<&MemberInfo> {
        self.type_info(handle)?
            .members
            .iter()
            .find(|m| m.name == name)
    }

    fn constructors_with_arity(&self, handle: TypeHandle, arity: usize) -> bool {
        self.type_info(handle)
            .map(|info| info.constructor_arities.contains(&arity))
            .unwrap_or(false)
    }
}
