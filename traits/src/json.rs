use std::{fs, io, path::Path};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A value that lives in a JSON file next to the binary.
pub trait JsonSync {
    type T: Serialize + DeserializeOwned;

    fn to_file(this: &Self::T, path: &Path) -> io::Result<()> {
        let str = serde_json::to_string_pretty(this)?;
        fs::write(path, str)
    }

    fn from_file(path: &Path) -> io::Result<Self::T> {
        let str = fs::read_to_string(path)?;
        let val: Self::T = serde_json::from_str(&str)?;

        Ok(val)
    }

    /// Falls back to [`JsonSync::new`] only when the file does not exist;
    /// a file that exists but doesn't parse is still an error.
    fn from_file_or_default(path: &Path) -> io::Result<Self::T> {
        match Self::from_file(path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            other => other,
        }
    }

    /// Like [`JsonSync::from_file_or_default`], but writes the default out so
    /// there is something to edit next time.
    fn from_file_or_create(path: &Path) -> io::Result<Self::T> {
        if path.exists() {
            return Self::from_file(path);
        }

        let val = Self::new();
        Self::to_file(&val, path)?;

        Ok(val)
    }

    fn new() -> Self::T;
    fn is_empty(this: &Self::T) -> bool;
}

/// Reads an arbitrary JSON document.
pub fn read_value(path: &Path) -> io::Result<Value> {
    let str = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&str)?)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use serde::{Deserialize, Serialize};

    use super::{read_value, JsonSync};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Counter {
        hits: u32,
    }

    impl JsonSync for Counter {
        type T = Self;

        fn new() -> Self::T {
            Self { hits: 0 }
        }

        fn is_empty(this: &Self::T) -> bool {
            this.hits == 0
        }
    }

    fn scratch(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("traits-json-{}-{name}", std::process::id()));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_reads_as_default() {
        let path = scratch("missing.json");

        let val = Counter::from_file_or_default(&path).unwrap();

        assert!(Counter::is_empty(&val));
        assert!(!path.exists());
    }

    #[test]
    fn create_writes_the_default() {
        let path = scratch("create.json");

        Counter::from_file_or_create(&path).unwrap();

        assert_eq!(read_value(&path).unwrap()["hits"], 0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn round_trip() {
        let path = scratch("round.json");

        Counter::to_file(&Counter { hits: 3 }, &path).unwrap();

        assert_eq!(Counter::from_file(&path).unwrap(), Counter { hits: 3 });
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn garbage_is_an_error() {
        let path = scratch("garbage.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(Counter::from_file_or_default(&path).is_err());
        fs::remove_file(&path).unwrap();
    }
}
