//! Form validation for the hospital admin pages.
//!
//! Each admin page used to carry its own `validateField` switch of regexes and
//! messages. Here a page is a [`FormSchema`]: a list of [`FieldSpec`]s, each an
//! ordered list of [`Rule`]s with messages, plus [`CrossCheck`]s between
//! fields. Validation returns every failing field at once as
//! [`ValidationErrors`].
//!
//! The crate also carries the two small helpers the list and patient pages
//! share: client-side [`paginate`] and [`age_on`].
//!
//! | Module | Role |
//! |--------|------|
//! | [`rules`] | Single-field rules and default messages |
//! | [`schema`] | `FormSchema`, `FieldSpec`, `CrossCheck`, `ValidationErrors` |
//! | [`schemas`] | Built-in schemas for each form page |
//! | [`paging`] | Client-side pagination |
//! | [`dates`] | Date parsing and age calculation |

pub mod dates;
pub mod paging;
pub mod rules;
pub mod schema;
pub mod schemas;

pub use dates::{DateError, age_on, parse_date};
pub use paging::{DEFAULT_PAGE_SIZE, Page, paginate};
pub use rules::Rule;
pub use schema::{Check, CrossCheck, FieldSpec, FormData, FormParseError, FormSchema, ValidationErrors, form_data, parse_form};
