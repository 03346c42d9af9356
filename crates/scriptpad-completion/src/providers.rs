/// Pluggable symbol providers
///
/// A provider yields the candidates of one source (host API, builtins,
/// keywords, ...). Providers know nothing about each other; the
/// [`SymbolRegistry`](crate::registry::SymbolRegistry) merges them in a fixed
/// priority order given by [`SourceCategory`].
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Priority classes of symbol sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceCategory {
    HostApi,
    Builtins,
    Keywords,
    Types,
    DunderMethods,
    Decorators,
    Modules,
    Exceptions,
}

impl SourceCategory {
    /// Default merge priority, highest first
    pub const DEFAULT_ORDER: [SourceCategory; 8] = [
        SourceCategory::HostApi,
        SourceCategory::Builtins,
        SourceCategory::Keywords,
        SourceCategory::Types,
        SourceCategory::DunderMethods,
        SourceCategory::Decorators,
        SourceCategory::Modules,
        SourceCategory::Exceptions,
    ];
}

/// A source of completion symbols
///
/// `collect` may be slow (host reflection walks hundreds of members); the
/// registry caches its output and only calls it again on refresh.
pub trait SymbolProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Priority class of this provider
    fn category(&self) -> SourceCategory;

    /// Produce the provider's symbols
    fn collect(&self) -> CompletionResult<Vec<Symbol>>;

    /// Resolve a short doc summary for one of this provider's names
    fn describe(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Look up a doc entry in a `(name, doc)` table
fn lookup_doc(table: &[(&str, &str)], name: &str) -> Option<String> {
    table
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, doc)| doc.to_string())
}

const BUILTIN_FUNCTIONS: &[(&str, &str)] = &[
    ("abs", "(x)"),
    ("all", "(iterable)"),
    ("any", "(iterable)"),
    ("ascii", "(obj)"),
    ("bin", "(x)"),
    ("breakpoint", "(*args, **kws)"),
    ("callable", "(obj)"),
    ("chr", "(i)"),
    ("classmethod", "(function)"),
    ("compile", "(source, filename, mode, flags=0, dont_inherit=False, optimize=-1)"),
    ("delattr", "(obj, name)"),
    ("dir", "([object])"),
    ("divmod", "(a, b)"),
    ("enumerate", "(iterable, start=0)"),
    ("eval", "(source, globals=None, locals=None)"),
    ("exec", "(source, globals=None, locals=None)"),
    ("filter", "(function, iterable)"),
    ("format", "(value, format_spec='')"),
    ("getattr", "(obj, name[, default])"),
    ("globals", "()"),
    ("hasattr", "(obj, name)"),
    ("hash", "(obj)"),
    ("help", "([object])"),
    ("hex", "(x)"),
    ("id", "(obj)"),
    ("input", "([prompt])"),
    ("isinstance", "(obj, classinfo)"),
    ("issubclass", "(cls, classinfo)"),
    ("iter", "(obj[, sentinel])"),
    ("len", "(obj)"),
    ("locals", "()"),
    ("map", "(function, iterable, ...)"),
    ("max", "(iterable, *[, key, default])"),
    ("min", "(iterable, *[, key, default])"),
    ("next", "(iterator[, default])"),
    ("oct", "(x)"),
    ("open", "(file, mode='r', buffering=-1, encoding=None, errors=None, newline=None)"),
    ("ord", "(c)"),
    ("pow", "(base, exp[, mod])"),
    ("print", "(*objects, sep=' ', end='\\n', file=None, flush=False)"),
    ("property", "(fget=None, fset=None, fdel=None, doc=None)"),
    ("repr", "(obj)"),
    ("reversed", "(seq)"),
    ("round", "(number, ndigits=None)"),
    ("setattr", "(obj, name, value)"),
    ("sorted", "(iterable, *, key=None, reverse=False)"),
    ("staticmethod", "(function)"),
    ("sum", "(iterable, start=0)"),
    ("super", "([type[, object-or-type]])"),
    ("vars", "([object])"),
    ("zip", "(*iterables, strict=False)"),
    ("__import__", "(name, globals=None, locals=None, fromlist=(), level=0)"),
];

const BUILTIN_OBJECTS: &[(&str, &str)] = &[
    ("Ellipsis", "..."),
    ("NotImplemented", "NotImplemented"),
    ("__debug__", "True"),
    ("__name__", "'__main__'"),
    ("__file__", "''"),
    ("__doc__", "None"),
    ("__builtins__", "{}"),
];

const BUILTIN_DOCS: &[(&str, &str)] = &[
    ("print", "Print objects to the text stream file."),
    ("len", "Return the number of items in a container."),
    ("open", "Open file and return a stream."),
    ("isinstance", "Return whether an object is an instance of a class."),
    ("getattr", "Get a named attribute from an object."),
    ("sorted", "Return a new list containing all items from the iterable in ascending order."),
    ("enumerate", "Return an enumerate object yielding (index, value) pairs."),
    ("range", "Return an immutable sequence of integers."),
];

/// Builtin functions and builtin objects of the scripting language
#[derive(Debug, Default, Clone)]
pub struct BuiltinProvider;

impl SymbolProvider for BuiltinProvider {
    fn name(&self) -> &str {
        "builtins"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::Builtins
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        let functions = BUILTIN_FUNCTIONS.iter().map(|(name, signature)| {
            Symbol::new(*name, SymbolKind::BuiltinFunction).with_signature(*signature)
        });
        let objects = BUILTIN_OBJECTS.iter().map(|(name, literal)| {
            Symbol::new(*name, SymbolKind::BuiltinObject).with_signature(*literal)
        });
        Ok(functions.chain(objects).collect())
    }

    fn describe(&self, name: &str) -> Option<String> {
        lookup_doc(BUILTIN_DOCS, name)
    }
}

const KEYWORDS: &[(&str, &str)] = &[
    ("False", "False value"),
    ("None", "None value"),
    ("True", "True value"),
    ("and", "Logical and"),
    ("as", "Alias"),
    ("assert", "Assert statement"),
    ("async", "Async function"),
    ("await", "Await expression"),
    ("break", "Break statement"),
    ("class", "Class definition"),
    ("continue", "Continue statement"),
    ("def", "Function definition"),
    ("del", "Delete statement"),
    ("elif", "Else-if clause"),
    ("else", "Else clause"),
    ("except", "Except block"),
    ("finally", "Finally block"),
    ("for", "For loop"),
    ("from", "From import"),
    ("global", "Global declaration"),
    ("if", "Conditional"),
    ("import", "Import statement"),
    ("in", "In operator"),
    ("is", "Is operator"),
    ("lambda", "Lambda function"),
    ("nonlocal", "Nonlocal declaration"),
    ("not", "Logical not"),
    ("or", "Logical or"),
    ("pass", "Pass statement"),
    ("raise", "Raise exception"),
    ("return", "Return statement"),
    ("try", "Try block"),
    ("while", "While loop"),
    ("with", "Context manager"),
    ("yield", "Yield statement"),
];

/// Whether `name` is a reserved word of the scripting language
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.iter().any(|(keyword, _)| *keyword == name)
}

/// Language keywords
#[derive(Debug, Default, Clone)]
pub struct KeywordProvider;

impl SymbolProvider for KeywordProvider {
    fn name(&self) -> &str {
        "keywords"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::Keywords
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        Ok(KEYWORDS
            .iter()
            .map(|(keyword, _)| Symbol::new(*keyword, SymbolKind::Keyword))
            .collect())
    }

    fn describe(&self, name: &str) -> Option<String> {
        lookup_doc(KEYWORDS, name)
    }
}

const TYPES: &[(&str, &str)] = &[
    ("bool", "(x=False)"),
    ("bytearray", "(source=b'')"),
    ("bytes", "(source=b'')"),
    ("complex", "(real=0, imag=0)"),
    ("dict", "(**kwargs)"),
    ("float", "(x=0.0)"),
    ("frozenset", "(iterable=())"),
    ("int", "(x=0)"),
    ("list", "(iterable=())"),
    ("memoryview", "(obj)"),
    ("object", "()"),
    ("range", "(start, stop[, step])"),
    ("set", "(iterable=())"),
    ("slice", "(start, stop[, step])"),
    ("str", "(object='')"),
    ("tuple", "(iterable=())"),
    ("type", "(obj)"),
];

/// Builtin type and runtime names
#[derive(Debug, Default, Clone)]
pub struct TypeProvider;

impl SymbolProvider for TypeProvider {
    fn name(&self) -> &str {
        "types"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::Types
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        Ok(TYPES
            .iter()
            .map(|(name, signature)| {
                Symbol::new(*name, SymbolKind::BuiltinObject).with_signature(*signature)
            })
            .collect())
    }

    fn describe(&self, name: &str) -> Option<String> {
        lookup_doc(BUILTIN_DOCS, name)
    }
}

const DUNDER_METHODS: &[(&str, &str)] = &[
    ("__init__", "(self)"),
    ("__new__", "(cls)"),
    ("__del__", "(self)"),
    ("__repr__", "(self)"),
    ("__str__", "(self)"),
    ("__eq__", "(self, other)"),
    ("__ne__", "(self, other)"),
    ("__lt__", "(self, other)"),
    ("__le__", "(self, other)"),
    ("__gt__", "(self, other)"),
    ("__ge__", "(self, other)"),
    ("__hash__", "(self)"),
    ("__bool__", "(self)"),
    ("__len__", "(self)"),
    ("__iter__", "(self)"),
    ("__next__", "(self)"),
    ("__contains__", "(self, item)"),
    ("__getitem__", "(self, key)"),
    ("__setitem__", "(self, key, value)"),
    ("__delitem__", "(self, key)"),
    ("__getattr__", "(self, name)"),
    ("__setattr__", "(self, name, value)"),
    ("__call__", "(self, *args, **kwargs)"),
    ("__enter__", "(self)"),
    ("__exit__", "(self, exc_type, exc_value, traceback)"),
    ("__add__", "(self, other)"),
    ("__sub__", "(self, other)"),
    ("__mul__", "(self, other)"),
    ("__truediv__", "(self, other)"),
];

/// Special ("dunder") method names
#[derive(Debug, Default, Clone)]
pub struct DunderProvider;

impl SymbolProvider for DunderProvider {
    fn name(&self) -> &str {
        "dunder_methods"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::DunderMethods
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        Ok(DUNDER_METHODS
            .iter()
            .map(|(name, signature)| {
                Symbol::new(*name, SymbolKind::DunderMethod).with_signature(*signature)
            })
            .collect())
    }
}

const DECORATORS: &[(&str, &str)] = &[
    ("property", "Property decorator for getters"),
    ("staticmethod", "Static method decorator"),
    ("classmethod", "Class method decorator"),
    ("abstractmethod", "Abstract method decorator"),
    ("cached_property", "Cached property decorator"),
    ("lru_cache", "LRU cache decorator"),
    ("wraps", "Wraps decorator for decorators"),
    ("contextmanager", "Context manager decorator"),
    ("dataclass", "Dataclass decorator"),
    ("overload", "Typing overload decorator"),
    ("async", "Async function marker"),
    ("await", "Await expression marker"),
];

/// Decorator names and async markers
#[derive(Debug, Default, Clone)]
pub struct DecoratorProvider;

impl SymbolProvider for DecoratorProvider {
    fn name(&self) -> &str {
        "decorators"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::Decorators
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        Ok(DECORATORS
            .iter()
            .map(|(name, _)| Symbol::new(*name, SymbolKind::Decorator))
            .collect())
    }

    fn describe(&self, name: &str) -> Option<String> {
        lookup_doc(DECORATORS, name)
    }
}

/// Modules commonly loaded in the host interpreter
pub const DEFAULT_MODULES: &[&str] = &[
    "nuke",
    "nukescripts",
    "os",
    "sys",
    "re",
    "json",
    "math",
    "random",
    "time",
    "datetime",
    "glob",
    "shutil",
    "subprocess",
    "threading",
    "collections",
    "functools",
    "itertools",
    "logging",
    "pathlib",
    "platform",
    "string",
    "traceback",
    "typing",
];

/// Names of loaded modules
#[derive(Debug, Clone)]
pub struct ModuleProvider {
    modules: Vec<String>,
}

impl ModuleProvider {
    pub fn new(modules: Vec<String>) -> Self {
        Self { modules }
    }
}

impl Default for ModuleProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MODULES.iter().map(|m| m.to_string()).collect())
    }
}

impl SymbolProvider for ModuleProvider {
    fn name(&self) -> &str {
        "modules"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::Modules
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        Ok(self
            .modules
            .iter()
            // Only the top-level package name is typed as a bare identifier
            .map(|module| module.split('.').next().unwrap_or(module))
            .map(|module| Symbol::new(module, SymbolKind::Module))
            .collect())
    }
}

const EXCEPTIONS: &[&str] = &[
    "ArithmeticError",
    "AssertionError",
    "AttributeError",
    "BaseException",
    "EOFError",
    "Exception",
    "FileExistsError",
    "FileNotFoundError",
    "ImportError",
    "IndexError",
    "KeyError",
    "KeyboardInterrupt",
    "LookupError",
    "MemoryError",
    "ModuleNotFoundError",
    "NameError",
    "NotImplementedError",
    "OSError",
    "OverflowError",
    "PermissionError",
    "RecursionError",
    "RuntimeError",
    "StopIteration",
    "SyntaxError",
    "SystemExit",
    "TimeoutError",
    "TypeError",
    "UnicodeDecodeError",
    "UnicodeEncodeError",
    "ValueError",
    "ZeroDivisionError",
];

/// Builtin exception class names
#[derive(Debug, Default, Clone)]
pub struct ExceptionProvider;

impl SymbolProvider for ExceptionProvider {
    fn name(&self) -> &str {
        "exceptions"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::Exceptions
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        Ok(EXCEPTIONS
            .iter()
            .map(|name| Symbol::new(*name, SymbolKind::Exception).with_signature("(*args)"))
            .collect())
    }
}

/// The full set of language providers, without host reflection
pub fn python_providers() -> Vec<std::sync::Arc<dyn SymbolProvider>> {
    vec![
        std::sync::Arc::new(BuiltinProvider),
        std::sync::Arc::new(KeywordProvider),
        std::sync::Arc::new(TypeProvider),
        std::sync::Arc::new(DunderProvider),
        std::sync::Arc::new(DecoratorProvider),
        std::sync::Arc::new(ModuleProvider::default()),
        std::sync::Arc::new(ExceptionProvider),
    ]
}
