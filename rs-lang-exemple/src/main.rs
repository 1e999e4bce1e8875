use std::io::{self, BufRead, Write};

use rs_lang_core::{Identifier, IdentifyError};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Load all corpora from the "data" directory (<language>.dat files)
    // Profiles are cached as .bin next to them and reloaded on the next run
    let app = Identifier::new("./data")?;

    // Build every profile up front instead of on the first sentence
    // A missing corpus only removes that language
    for failure in app.preload() {
        eprintln!("warning: {failure}");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("enter sentence >> ");
        stdout.flush()?;

        line.clear();
        // End of input behaves like "quit"
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            break;
        }

        let sentence = line.trim_end_matches(['\r', '\n']);
        if sentence.eq_ignore_ascii_case("quit") {
            println!("bye!");
            break;
        }

        match app.identify(sentence) {
            Ok(language) => println!("{language}"),
            Err(IdentifyError::NoLanguagesAvailable) => println!("language undetermined"),
        }
    }

    Ok(())
}
