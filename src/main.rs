fn main() {
    std::process::exit(i32::from(capsule_dist::run()));
}
