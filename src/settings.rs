use serde::{Deserialize, Serialize};

// Well-known target type names the lowering falls back on. The generic
// object type is the conservative answer whenever inference gives up.
pub const GENERIC_OBJECT_TYPE: &str = "System.Object";
pub const STRING_TYPE: &str = "System.String";
pub const BOOL_TYPE: &str = "System.Boolean";
pub const INT_TYPE: &str = "System.Int32";
pub const LONG_TYPE: &str = "System.Int64";
pub const DOUBLE_TYPE: &str = "System.Double";

// Runtime support library. The emitter links the generated code against
// these; the translator only ever names them.
pub const RUNTIME_OPERATORS_CLASS: &str = "PhpRuntime.Operators";
pub const RUNTIME_FUNCTIONS_CLASS: &str = "PhpRuntime.Functions";
pub const RUNTIME_CONSTANTS_CLASS: &str = "PhpRuntime.Constants";
pub const RUNTIME_ARRAY_CLASS: &str = "PhpRuntime.PhpArray";
pub const RUNTIME_INDIRECT_CLASS: &str = "PhpRuntime.IndirectReference";

// Operator helper methods on RUNTIME_OPERATORS_CLASS.
pub const SELECT_HELPER: &str = "Select";
pub const PREVIOUS_VALUE_HELPER: &str = "PreviousValue";
pub const ECHO_HELPER: &str = "Echo";
pub const PRINT_HELPER: &str = "Print";
pub const CLONE_HELPER: &str = "Clone";
pub const SUPPRESS_HELPER: &str = "Suppress";
pub const SHELL_EXEC_HELPER: &str = "ShellExec";
pub const INSTANCE_OF_HELPER: &str = "InstanceOf";
pub const XOR_HELPER: &str = "Xor";
/// Distinguished value assigned by `unset()` on member and indexed
/// targets. An approximation of removal, not removal.
pub const UNSET_SENTINEL_FIELD: &str = "UnsetValue";

// Methods on RUNTIME_ARRAY_CLASS used by lowered array code.
pub const ARRAY_SET_ITEM: &str = "SetItem";
pub const ARRAY_ADD: &str = "Add";
pub const ARRAY_RESET: &str = "Reset";
pub const ARRAY_NEXT: &str = "Next";
pub const ARRAY_KEY: &str = "Key";
pub const ARRAY_CURRENT: &str = "Current";

pub const CONSTRUCTOR_METHOD_NAME: &str = "__construct";

// Designer tooling reserves this identifier for its own generated member,
// so a PHP local with the same name gets renamed. The rename must stay
// stable: generated code and the designer both rely on it.
pub const DESIGNER_RESERVED_LOCAL: &str = "components";
pub const DESIGNER_RESERVED_RENAME: &str = "components1";

/// How `new T(array($obj, 'method'))` is recognized as a delegate
/// construction. PHP has no delegate syntax, so this is a heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelegateDetection {
    /// Only when `T` resolves to a referenced delegate type with a
    /// two-argument constructor.
    ByResolvedType,
    /// Any constructor call with the two-element-array-and-string shape.
    AnySyntacticMatch,
    Disabled,
}

/// How `$expr->Event->Add($handler)` / `->Remove($handler)` statements are
/// recognized as event attach/detach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventRecognition {
    /// Only when the handler argument lowers to a delegate creation.
    DelegateArgumentOnly,
    AnySyntacticMatch,
    Disabled,
}

/// Constructor-time translator configuration, immutable per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorConfig {
    pub delegate_detection: DelegateDetection,
    pub event_recognition: EventRecognition,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        TranslatorConfig {
            delegate_detection: DelegateDetection::ByResolvedType,
            event_recognition: EventRecognition::DelegateArgumentOnly,
        }
    }
}
