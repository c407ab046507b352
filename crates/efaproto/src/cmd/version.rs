use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("efaproto {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: efaproto");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("EFAPROTO_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("features: serial={}, cli=true", cfg!(feature = "serial"));
    println!(
        "defaults: baud={}, timeout={:?}",
        efaproto_transport::DEFAULT_BAUD_RATE,
        efaproto_session::DEFAULT_TIMEOUT
    );

    Ok(SUCCESS)
}
