use std::env::args_os;

use ppm_image_editor::{run, CLIParser};

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match run(&arguments) {
        Ok(_) => println!("Session finished"),
        Err(e) => eprintln!("Session aborted because of: {}", e),
    }
}
