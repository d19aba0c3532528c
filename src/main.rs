fn main() -> std::process::ExitCode {
    cmdterm_lib::run()
}
