use std::io::BufRead;
use std::{env, fs, io, path};

fn main() {
    env_logger::init();

    let path = env::args().nth(1).map(path::PathBuf::from).unwrap_or_else(|| {
        home::home_dir()
            .unwrap_or_else(|| path::PathBuf::from("/home/core/"))
            .join(".ssh")
            .join("authorized_keys")
    });
    println!("Inspecting '{}':", path.to_string_lossy());
    let file = fs::File::open(&path).expect("unable to open key file");
    let reader = io::BufReader::new(file);

    for (i, line) in reader.lines().enumerate() {
        let line = line.unwrap_or_else(|_| panic!("unable to read key at line {}", i + 1));
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        match openssh_pubkey::PublicKey::parse(&line) {
            Ok(key) => println!(
                " * Line #{} -> {} {} {} {}",
                i + 1,
                key.length(),
                key.keytype(),
                key.to_md5_fingerprint_string(),
                key.to_fingerprint_string(),
            ),
            Err(e) => println!(" * Line #{} -> skipped: {}", i + 1, e),
        }
    }
}
