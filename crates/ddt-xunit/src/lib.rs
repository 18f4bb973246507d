//! # ddt-xunit
//!
//! Generates xUnit test skeletons from the class model built by
//! `ddt-parser`: one `[Fact]` per public instance method, with arrange,
//! act and assert sections ready to be filled in.
//!
//! Generation is pure. Generic parameter erasure and the nullability
//! policy produce rewritten copies of the model's types, so the same
//! class can be rendered with different settings.

pub mod class;
pub mod generics;
pub mod method;

pub use class::{TestClass, test_classes_for};
pub use generics::{TypeRewriter, is_generic_parameter_name};
pub use method::{TestMethod, primary_constructor};
