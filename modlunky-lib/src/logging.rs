use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::Result;

/// Install a global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Meant to be called once by the host application before the store is built.
pub fn init() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::{Error, logging::init};

    #[test]
    fn test_init_only_once() {
        // Whatever the first call returns, a global default is installed afterwards
        let _ = init();

        assert!(matches!(init(), Err(Error::Logging(_))));
    }
}
