// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! The semantic type model.
//!
//! Every expression and declaration resolves to a [`VarDec`]: a base type,
//! an array dimension, an optional class name for class references, and a
//! constness flag. Two equality classes exist:
//!
//! - **Strict** equality is used when declaring constructors, to detect
//!   duplicate overloads.
//! - **Non-strict** equality is used at call sites and in terms: `float`
//!   and `double` match each other, `CUSTOM` matches anything of the same
//!   dimension, and `EXTERNAL_RET` on either side matches everything.

use ecow::EcoString;

use crate::ast::TypeName;

/// The base kind of a [`VarDec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// `int`
    Integer,
    /// `double`
    Double,
    /// `float`
    Float,
    /// `short`
    Short,
    /// `long`
    Long,
    /// `char`
    Char,
    /// `boolean`
    Boolean,
    /// `String`
    Str,
    /// `void`
    Void,
    /// Unconstrained type for untyped declarations and parameters.
    Custom,
    /// A reference to a user-declared class; the class name lives in
    /// [`VarDec::class_name`].
    ClassRef,
    /// Marker type of a constructor entry in a class parameter list.
    ConstructorParam,
    /// A class parameter or interface bound in a class header.
    ExtClassOrInterface,
    /// Result of reaching through an `include`d symbol; matches anything.
    ExternalRet,
    /// The `null` literal.
    Null,
    /// Pseudo-type used when a call was expected (diagnostic rendering).
    EFunctionCall,
    /// Pseudo-type used when a non-call was expected (diagnostic
    /// rendering).
    ENonFunctionCall,
}

impl BaseType {
    /// Returns the rendering used in expected/got diagnostics.
    #[must_use]
    pub const fn render(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Double => "DOUBLE",
            Self::Float => "FLOAT",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Char => "CHAR",
            Self::Boolean => "BOOLEAN",
            Self::Str => "STRING",
            Self::Void => "VOID",
            Self::Custom => "CUSTOM",
            Self::ClassRef => "CLASS",
            Self::ConstructorParam => "CONSTRUCTOR",
            Self::ExtClassOrInterface => "EXT_CLASS_OR_INTERFACE",
            Self::ExternalRet => "EXT",
            Self::Null => "null",
            Self::EFunctionCall => "<FUNCTION_CALL>",
            Self::ENonFunctionCall => "<NON_FUNCTION_CALL>",
        }
    }
}

/// The declared type of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDec {
    /// The base kind.
    pub base: BaseType,
    /// Array dimension; goes negative only transiently while checking
    /// array accesses, which is a diagnostic.
    pub dimension: i32,
    /// Class name when `base` is [`BaseType::ClassRef`].
    pub class_name: Option<EcoString>,
    /// `true` for `const` declarations.
    pub constant: bool,
}

impl VarDec {
    /// Creates a scalar type.
    #[must_use]
    pub const fn new(base: BaseType) -> Self {
        Self {
            base,
            dimension: 0,
            class_name: None,
            constant: false,
        }
    }

    /// Creates a type with an array dimension.
    #[must_use]
    pub const fn with_dimension(base: BaseType, dimension: i32) -> Self {
        Self {
            base,
            dimension,
            class_name: None,
            constant: false,
        }
    }

    /// The unconstrained type.
    #[must_use]
    pub const fn custom() -> Self {
        Self::new(BaseType::Custom)
    }

    /// The `null` type.
    #[must_use]
    pub const fn null() -> Self {
        Self::new(BaseType::Null)
    }

    /// The external wildcard type.
    #[must_use]
    pub const fn external_ret() -> Self {
        Self::new(BaseType::ExternalRet)
    }

    /// A class reference.
    #[must_use]
    pub fn class_ref(name: impl Into<EcoString>, dimension: i32) -> Self {
        Self {
            base: BaseType::ClassRef,
            dimension,
            class_name: Some(name.into()),
            constant: false,
        }
    }

    /// Resolves a written type annotation to a `VarDec`. Unknown base
    /// names become class references.
    #[must_use]
    pub fn from_type_name(type_name: &TypeName, constant: bool) -> Self {
        let base = match type_name.base.as_str() {
            "int" => BaseType::Integer,
            "double" => BaseType::Double,
            "float" => BaseType::Float,
            "short" => BaseType::Short,
            "long" => BaseType::Long,
            "char" => BaseType::Char,
            "boolean" => BaseType::Boolean,
            "String" => BaseType::Str,
            "void" => BaseType::Void,
            _ => BaseType::ClassRef,
        };

        #[expect(
            clippy::cast_possible_wrap,
            reason = "dimension suffixes never approach i32::MAX"
        )]
        let dimension = type_name.dimension as i32;
        let class_name = if base == BaseType::ClassRef {
            Some(type_name.base.clone())
        } else {
            None
        };
        Self {
            base,
            dimension,
            class_name,
            constant,
        }
    }

    /// Marks the type constant.
    #[must_use]
    pub fn into_constant(mut self) -> Self {
        self.constant = true;
        self
    }

    /// Equality under the chosen class; see the module docs.
    #[must_use]
    pub fn matches(&self, other: &Self, strict: bool) -> bool {
        if strict {
            self.strict_matches(other)
        } else {
            self.non_strict_matches(other)
        }
    }

    /// Strict equality: identical base and dimension; class references
    /// must name the same class. `EXTERNAL_RET` still matches anything.
    #[must_use]
    pub fn strict_matches(&self, other: &Self) -> bool {
        if self.base == BaseType::ExternalRet || other.base == BaseType::ExternalRet {
            return true;
        }
        if self.base == BaseType::ClassRef && other.base == BaseType::ClassRef {
            return self.class_name == other.class_name && self.dimension == other.dimension;
        }
        self.base == other.base && self.dimension == other.dimension
    }

    /// Non-strict equality: `float`/`double` interchange, `CUSTOM` matches
    /// any base of the same dimension, `EXTERNAL_RET` matches everything.
    #[must_use]
    pub fn non_strict_matches(&self, other: &Self) -> bool {
        if self.base == BaseType::ExternalRet || other.base == BaseType::ExternalRet {
            return true;
        }
        if self.dimension == other.dimension
            && (self.base == BaseType::Custom || other.base == BaseType::Custom)
        {
            return true;
        }
        if matches!(self.base, BaseType::Double | BaseType::Float)
            && matches!(other.base, BaseType::Double | BaseType::Float)
        {
            return self.dimension == other.dimension;
        }
        if self.base == BaseType::ClassRef && other.base == BaseType::ClassRef {
            return self.class_name == other.class_name && self.dimension == other.dimension;
        }
        self.base == other.base && self.dimension == other.dimension
    }

    /// Renders the type for expected/got diagnostics: the base name (or
    /// class name) followed by one `[]` per dimension, with a `-` marking
    /// the invalid negative range.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.base == BaseType::ClassRef {
            out.push_str(self.class_name.as_deref().unwrap_or("CLASS"));
        } else {
            out.push_str(self.base.render());
        }
        if self.dimension < 0 {
            out.push('-');
        }
        for _ in 0..self.dimension.unsigned_abs() {
            out.push_str("[]");
        }
        out
    }
}

impl std::fmt::Display for VarDec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
