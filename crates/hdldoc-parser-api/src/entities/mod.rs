pub mod module;
pub mod object;
pub mod parameter;

pub use module::Module;
pub use object::{Documentable, ObjectKind};
pub use parameter::{is_array_type, Parameter, PortMode};
