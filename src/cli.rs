use std::env;
use std::net::SocketAddr;
use std::process;
use std::time::Duration;

use chrono::FixedOffset;
use getopts::{Matches, Options};

use timetable_ical_proxy::{Config, TableMapping, DEFAULT_FETCH_TIMEOUT, DEFAULT_SOURCE_URL};

pub struct Args {
    pub address: SocketAddr,
    pub print: bool,
    pub config: Config,
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
        "Socket address (IP and port) to listen on [Default: 127.0.0.1:8081]",
        "SOCKET_ADDRESS",
    );
    opts.optopt(
        "u",
        "source-url",
        &format!("Timetable page to read classes from [Default: {DEFAULT_SOURCE_URL}]"),
        "URL",
    );
    opts.optopt(
        "t",
        "timeout",
        &format!(
            "Timeout for fetching the timetable page [Default: {}]",
            DEFAULT_FETCH_TIMEOUT.as_secs()
        ),
        "SECONDS",
    );
    opts.optopt(
        "o",
        "utc-offset",
        "Offset of the timetable's time zone from UTC [Default: 0]",
        "MINUTES",
    );
    opts.optmulti(
        "T",
        "table",
        "Map a timetable table id to a weekday, Monday being 0. \
         Replaces the default tablepress-1..7 mapping",
        "ID=DAY",
    );
    opts.optflag(
        "p",
        "print",
        "Fetch the timetable once, print it as JSON and exit",
    );
    opts
}

fn fail(message: String) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(err) => fail(err.to_string()),
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let address = match matches.opt_get_default("address", SocketAddr::from(([127, 0, 0, 1], 8081)))
    {
        Ok(address) => address,
        Err(err) => fail(format!("Provided value for option 'address' is invalid: {err}")),
    };

    Args {
        address,
        print: matches.opt_present("print"),
        config: config(&matches),
    }
}

fn config(matches: &Matches) -> Config {
    let defaults = Config::default();

    let source_url = matches.opt_str("source-url").unwrap_or(defaults.source_url);

    let fetch_timeout = match matches.opt_get::<u64>("timeout") {
        Ok(Some(0)) => fail("Provided value for option 'timeout' must be positive".into()),
        Ok(Some(secs)) => Duration::from_secs(secs),
        Ok(None) => defaults.fetch_timeout,
        Err(err) => fail(format!("Provided value for option 'timeout' is invalid: {err}")),
    };

    let utc_offset = match matches.opt_get::<i32>("utc-offset") {
        Ok(Some(minutes)) => match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
            Some(offset) => offset,
            None => fail(format!(
                "Provided value for option 'utc-offset' is out of range: {minutes}"
            )),
        },
        Ok(None) => defaults.utc_offset,
        Err(err) => fail(format!("Provided value for option 'utc-offset' is invalid: {err}")),
    };

    let entries = matches.opt_strs("table");
    let tables = if entries.is_empty() {
        defaults.tables
    } else {
        match TableMapping::from_entries(&entries) {
            Ok(tables) => tables,
            Err(err) => fail(format!("Provided value for option 'table' is invalid: {err}")),
        }
    };

    Config {
        source_url,
        fetch_timeout,
        tables,
        utc_offset,
    }
}
