//! Window demo: completes the stepped sample shape and plays both animation
//! phases under the orbiting camera. Close the window or hit Escape to quit.

fn main() -> anyhow::Result<()> {
    cubeflow::app::run()
}
