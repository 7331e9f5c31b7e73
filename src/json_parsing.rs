use{
    serde::{de::DeserializeOwned, Serialize},
    serde_json::Value,
    std::{
        fs::File,
        io::{BufReader, Write},
        process::exit
    }
};

/// Reads the parameter struct from a json file. Without a file the default
/// parameters are printed as a template and the program exits, so every
/// subcommand documents itself.
pub fn parse<P>(file: Option<&String>) -> (P, Value)
where P: Default + Serialize + DeserializeOwned
{
    match file{
        None => {
            let example = P::default();
            serde_json::to_writer_pretty(std::io::stdout(), &example)
                .expect("unable to serialize default parameters");
            println!();
            eprintln!("no json file specified - printed default parameters instead");
            exit(0)
        }
        Some(path) => {
            let file = File::open(path)
                .expect("unable to open json file");
            let json: Value = serde_json::from_reader(BufReader::new(file))
                .expect("file is not valid json");
            let params = serde_json::from_value(json.clone())
                .expect("json does not match the expected parameters");
            (params, json)
        }
    }
}

/// Echoes the parameter json into a dat-file header line.
pub fn write_json<W: Write>(writer: &mut W, json: &Value)
{
    writeln!(writer, "#{}", json)
        .expect("unable to write json header");
}
