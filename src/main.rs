use clap::Parser;
use simpleread::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("SimpleRead - descriptor-driven column data reader");
    println!("=================================================");
    println!();
    println!("Read whitespace-separated data into named datasets described by a");
    println!("compact column descriptor such as 'x+- y+,- z+-[1:5]'.");
    println!();
    println!("USAGE:");
    println!("    simpleread <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    import        Import datasets from a file or string using a descriptor");
    println!("    import2d      Import 2D matrices from a file or string");
    println!("    descriptor    Parse a descriptor and print its canonical form");
    println!("    help          Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Read values with symmetric errors and a second column:");
    println!("    simpleread import data.dat -d 'x+- y'");
    println!();
    println!("    # Read blocks separated by blank lines as x_1, x_2, ...:");
    println!("    simpleread import data.dat -d x --blocks --format json");
    println!();
    println!("    # Name columns automatically (col1, col2, ...):");
    println!("    simpleread import --data '1 2 3\\n4 5 6' --show-data");
    println!();
    println!("    # Read two matrices with an x range:");
    println!("    simpleread import2d image.dat --names a,b --xrange 0,10");
    println!();
    println!("For detailed help on any command, use:");
    println!("    simpleread <COMMAND> --help");
}
