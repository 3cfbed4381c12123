//! Retrieves information about the version of the engine from Git and the build
//! environment. This information is then accessible at runtime through the
//! generated `build` module.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
