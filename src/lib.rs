//! flagform - resolve command-line flags and interactive answers into validated values

pub mod cli;
pub mod context;
pub mod definition;
pub mod error;
pub mod field;
pub mod form;
pub mod input;
pub mod prompt;
pub mod question;
pub mod value;

pub use cli::{form_command, MatchesInput};
pub use context::Mode;
pub use definition::{FieldDefinition, FieldType, FormDefinition};
pub use error::{FieldRef, FixSuggestion, FormError, Result};
pub use field::{Check, Choices, Condition, Field, FieldKind, FileConfig, OptionsConfig, SplitPattern};
pub use form::Form;
pub use input::{Arity, InputSource, MemoryInput, OptionRegistry, OptionSpec};
pub use prompt::{PromptAsker, ScriptedAsker, TerminalAsker};
pub use question::Question;
pub use value::Values;
