use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;

use getopts::Options;

pub struct Args {
    pub address: SocketAddr,
    pub data_dir: PathBuf,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "a",
        "address",
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:7055]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "d",
        "data-dir",
        "Directory holding settings.json and courses.json [Default: data]",
        "PATH",
    );
    opts
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let address = match matches.opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 7055)))
    {
        Ok(address) => address,
        Err(err) => {
            eprintln!("Provided value for option 'address' is invalid: {err}");
            process::exit(1);
        }
    };

    let data_dir = matches
        .opt_str("data-dir")
        .map_or_else(|| PathBuf::from("data"), PathBuf::from);

    Args { address, data_dir }
}
