use std::{env, fs, path::Path};

/// Places `config.json` next to the compiled binary so `cargo run` and a
/// copied `target/<profile>` directory both find it.
fn main() {
    println!("cargo:rerun-if-changed=config.json");

    // OUT_DIR = target/<profile>/build/<crate>-<hash>/out
    let Ok(out_dir) = env::var("OUT_DIR") else {
        println!("cargo:warning=OUT_DIR not set, skipping config.json copy");
        return;
    };

    let Some(profile_dir) = Path::new(&out_dir).ancestors().nth(3) else {
        println!("cargo:warning=cannot locate target profile directory");
        return;
    };

    let src = Path::new("config.json");
    let dst = profile_dir.join("config.json");

    if let Err(e) = fs::copy(src, &dst) {
        println!("cargo:warning=could not copy config.json to {}: {}", dst.display(), e);
    }
}
