use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_script_file_argument(command);
        Self::register_execute_argument(command)
    }

    fn register_script_file_argument(command: Command) -> Command {
        command.arg(Self::create_script_file_argument())
    }

    fn register_execute_argument(command: Command) -> Command {
        command.arg(Self::create_execute_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_script_file_argument() -> Arg {
        Arg::new("script_file")
            .help("Path to a script file with one instruction per line")
            .value_parser(value_parser!(PathBuf))
            .required(false)
    }

    fn create_execute_argument() -> Arg {
        arg!(execute: -e --execute <INSTRUCTION> "Instruction to execute, may be repeated")
            .action(ArgAction::Append)
            .required(false)
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments::new(
            Self::extract_script_file_argument(matches),
            Self::extract_execute_argument(matches),
        )
    }

    fn extract_script_file_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("script_file").cloned()
    }

    fn extract_execute_argument(matches: &ArgMatches) -> Vec<String> {
        matches
            .get_many::<String>("execute")
            .map(|instructions| instructions.cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}
