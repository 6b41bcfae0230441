use std::io;

use thrift_transport::{TransportException, TransportExceptionType, classify};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt, duplex},
    time::{Duration, timeout},
};

async fn read_exact_into_exception<R: AsyncRead + Unpin>(
    reader: &mut R,
    len: usize,
) -> Result<Vec<u8>, TransportException> {
    let mut buf = vec![0_u8; len];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

#[tokio::test]
async fn truncated_read_classifies_end_of_file() {
    let (mut tx, mut rx) = duplex(64);

    tx.write_all(b"abc")
        .await
        .expect("partial payload write should succeed");
    drop(tx);

    let mut buf = [0_u8; 8];
    let err = rx
        .read_exact(&mut buf)
        .await
        .expect_err("truncated read should fail");
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

    let exception = classify(&err);
    assert_eq!(exception.kind(), TransportExceptionType::EndOfFile);
    assert_eq!(exception.message(), err.to_string());
}

#[tokio::test]
async fn question_mark_converts_io_errors() {
    let (tx, mut rx) = duplex(64);
    drop(tx);

    let exception = read_exact_into_exception(&mut rx, 4)
        .await
        .expect_err("read from closed peer should fail");
    assert_eq!(exception.kind(), TransportExceptionType::EndOfFile);
}

#[tokio::test]
async fn elapsed_deadline_classifies_timed_out() {
    let (_tx, mut rx) = duplex(64);
    let mut buf = [0_u8; 1];

    let elapsed = timeout(Duration::from_millis(10), rx.read_exact(&mut buf))
        .await
        .expect_err("read with no writer should time out");

    let exception = classify(&elapsed);
    assert_eq!(exception.kind(), TransportExceptionType::TimedOut);
    assert_eq!(exception.message(), elapsed.to_string());

    let as_io = io::Error::from(elapsed);
    let as_io_message = as_io.to_string();
    let exception = TransportException::from(as_io);
    assert_eq!(exception.kind(), TransportExceptionType::TimedOut);
    assert_eq!(exception.message(), as_io_message);
}

#[tokio::test]
async fn wrapped_elapsed_in_source_chain_classifies_timed_out() {
    #[derive(Debug)]
    struct ReadFailed(io::Error);

    impl std::fmt::Display for ReadFailed {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("read failed")
        }
    }

    impl std::error::Error for ReadFailed {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    let (_tx, mut rx) = duplex(64);
    let mut buf = [0_u8; 1];
    let elapsed = timeout(Duration::from_millis(10), rx.read_exact(&mut buf))
        .await
        .expect_err("read with no writer should time out");

    let err = ReadFailed(io::Error::other(elapsed));
    let exception = classify(&err as &(dyn std::error::Error + 'static));
    assert_eq!(exception.kind(), TransportExceptionType::TimedOut);
    assert_eq!(exception.message(), "read failed");
}
