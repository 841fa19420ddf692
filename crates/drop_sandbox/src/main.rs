fn main() {
    drop_sandbox::run();
}
