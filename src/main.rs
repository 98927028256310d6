fn main() {
    ucpmaroc_service::main();
}
