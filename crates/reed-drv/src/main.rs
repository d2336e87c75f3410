use std::process::ExitCode;

fn main() -> ExitCode {
    reed_drv::run()
}
