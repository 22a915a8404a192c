//! libgate main entrypoint.

use libgate::run;
use libgate::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
