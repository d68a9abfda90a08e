use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

fn main() {
    // Tell Cargo to rebuild if this build script changes
    println!("cargo:rerun-if-changed=build.rs");

    // Tell Cargo to rebuild if the secrets file changes
    println!("cargo:rerun-if-changed=secrets.txt");

    read_api_secrets();
}

fn read_api_secrets() {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let secrets_path = Path::new(&manifest_dir).join("secrets.txt");

    if !secrets_path.exists() {
        println!("No secrets.txt file found, AI classification needs a runtime API key");
        return;
    }

    match File::open(&secrets_path) {
        Ok(file) => {
            let reader = BufReader::new(file);

            for line in reader.lines().map_while(Result::ok) {
                if line.trim().is_empty() || line.trim().starts_with("//") {
                    continue;
                }

                if let Some((key, value)) = line.split_once('=') {
                    if key.trim() == "GEMINI_APIKEY" {
                        println!("cargo:rustc-env=GEMINI_APIKEY={}", value.trim());
                    }
                }
            }
        },
        Err(e) => {
            println!("Failed to open secrets.txt: {}", e);
        }
    }
}
