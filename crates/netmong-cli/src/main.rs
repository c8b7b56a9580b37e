//! netmong - posts and threaded comments from the terminal
//!
//! ## Quick Start
//!
//! ```bash
//! # Register members
//! netmong member add alice
//! netmong member add bob
//!
//! # Publish a post and discuss it
//! netmong --as alice post upload "Walk" "Park day"
//! netmong --as bob comment add 1 "Lovely"
//! netmong --as alice comment reply 1 "Thanks"
//!
//! # Read the thread
//! netmong comment list 1
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
