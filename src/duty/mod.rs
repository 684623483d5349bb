pub mod input_types;
pub mod output_types;
pub mod interface;
pub mod session;

pub mod translation_duty;
pub mod summarization_duty;

pub use input_types::*;
pub use output_types::*;
pub use interface::*;
pub use session::*;
pub use translation_duty::*;
pub use summarization_duty::*;
