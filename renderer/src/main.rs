fn main() {
    renderer::run();
}
