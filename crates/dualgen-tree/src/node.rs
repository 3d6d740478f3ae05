//! The intermediate tree every artifact is built as.

/// A literal value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    Num(f64),
    Int(u64),
    Bool(bool),
    /// A reference to another declaration, written bare.
    Ref(String),
    Array(Vec<Value>),
    /// Properties in emission order.
    Object(Vec<(String, Value)>),
}

impl Value {
    pub fn str(text: impl Into<String>) -> Self {
        Self::Str(text.into())
    }

    pub fn strings<S: AsRef<str>>(items: &[S]) -> Self {
        Self::Array(items.iter().map(|s| Self::str(s.as_ref())).collect())
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// An expression: either a literal or verbatim code.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Value(Value),
    Code(String),
}

impl Expr {
    pub fn code(text: impl Into<String>) -> Self {
        Self::Code(text.into())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Return(Expr),
    Const { name: String, value: Expr },
    If { condition: String, then: Vec<Stmt> },
    Switch {
        subject: String,
        cases: Vec<(Value, Vec<Stmt>)>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: String,
    pub default: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A top-level declaration. Everything except `Import` is exported.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Import {
        names: Vec<String>,
        from: String,
        type_only: bool,
    },
    /// A union of string literal types; `never` when empty.
    TypeAlias { name: String, members: Vec<String> },
    /// Read-only members in emission order.
    Interface {
        name: String,
        members: Vec<(String, String)>,
    },
    Constant {
        name: String,
        ty: Option<String>,
        value: Expr,
    },
    Function {
        name: String,
        params: Vec<Param>,
        returns: String,
        body: Vec<Stmt>,
    },
    /// `export * from` a sibling module.
    Export { from: String },
}

/// One output file.
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    pub path: String,
    pub header: Vec<String>,
    pub nodes: Vec<Node>,
}
