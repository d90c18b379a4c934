/*
[INPUT]:  Gateway and callback schema definitions and serde requirements
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions for backend communication
[UPDATE]: When API schema changes or new types added
*/

pub mod callback;
pub mod enums;
pub mod requests;
pub mod responses;

pub use callback::*;
pub use enums::*;
pub use requests::*;
pub use responses::*;
