//! # API Route Modules
//!
//! - `entries`: recorded entries: paginated, date-filtered listing and
//!   creation from a validated JSON body.

pub mod entries;
