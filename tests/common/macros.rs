#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok(_), got Err({:?})", err),
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(val) => val,
            Err(err) => panic!("Expected Ok(_): {}: {:?}", format_args!($($arg)+), err),
        }
    };
}

#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(_) => panic!("Expected Err(_), got Ok(_)"),
            Err(err) => err,
        }
    };
    ($expr:expr, $($arg:tt)+) => {
        match $expr {
            Ok(_) => panic!("Expected Err(_): {}", format_args!($($arg)+)),
            Err(err) => err,
        }
    };
}

/// Asserts the resident keys of an `LRUCache`, most recently used first.
#[macro_export]
macro_rules! assert_recency {
    ($cache:expr, $expected:expr) => {
        assert_eq!(
            $cache.keys().cloned().collect::<Vec<_>>(),
            $expected.to_vec(),
            "unexpected recency order"
        );
    };
}
