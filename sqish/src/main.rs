use std::process::ExitCode;

fn main() -> ExitCode {
    sqish::lib_main()
}
