//! Interactive command-line grammar engine.
//!
//! Commands are declared as a tree of [`Command`]s with typed arguments and
//! options. A [`Session`] takes raw lines, validates them against the tree,
//! and dispatches them to handlers; it also completes partial input and
//! keeps a bounded history.
//!
//! ```no_run
//! use termform::core::{Command, CommandTree, Context, Session};
//! use termform::models::{Message, OptionSpec, Prepared, ValueType};
//!
//! let mut tree = CommandTree::new();
//! tree.add_command(
//!     &[] as &[&str],
//!     Command::new("greet")
//!         .option(OptionSpec::new("name", ValueType::String))
//!         .handler(|_: &mut Context, _: &Prepared, options: &Prepared| -> Option<Message> {
//!             Some(Message::success(format!("hello {}", options.str("name")?)))
//!         }),
//! )?;
//!
//! let mut session = Session::new(tree);
//! let reply = session.execute("greet --name=ada");
//! # Ok::<(), termform::core::SchemaError>(())
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::{Command, CommandTree, Session};
