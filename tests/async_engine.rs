//! Suspending entry points: identical contracts, suspension only at the
//! native-call boundary.

mod common;

use common::patterned;

use oxidirect::buffer::{AlignedBuffer, BufferList, BufferPool, IoVec};
use oxidirect::device::MemDevice;
use oxidirect::engine::{self, CancelToken};
use oxidirect::error::DirectIoError;
use oxidirect::transfer::{drive_read, drive_read_async, drive_write_async};

#[tokio::test]
async fn async_read_write_round_trip() {
    let dev = MemDevice::new();
    let content = patterned(512);

    let list = BufferList::new(vec![IoVec::Write(&content)]);
    let written = engine::write_async(&dev, 0, &list).await.unwrap();
    assert_eq!(written, 512);

    let mut back = [0u8; 512];
    let mut rlist = BufferList::new(vec![IoVec::Read(&mut back)]);
    let read = engine::read_async(&dev, 0, &mut rlist).await.unwrap();
    assert_eq!(read, 512);
    drop(rlist);
    assert_eq!(&back[..], &content[..]);
}

#[tokio::test]
async fn async_drive_round_trip() {
    let dev = MemDevice::with_alignment(512);
    let pool = BufferPool::new(2048, 512, 2, 4).unwrap();
    let content = patterned(512 * 9);

    let outcome = drive_write_async(&dev, &pool, 0, &content).await.unwrap();
    assert!(outcome.phase.is_complete());

    let mut back = Vec::new();
    let outcome = drive_read_async(&dev, &pool, 0, |chunk| back.extend_from_slice(chunk))
        .await
        .unwrap();
    assert_eq!(outcome.bytes_transferred, content.len() as u64);
    assert!(outcome.phase.is_short_circuited());
    assert_eq!(back, content);
}

#[tokio::test]
async fn pre_cancelled_token_fails_before_any_transfer() {
    let dev = MemDevice::with_content(&patterned(4096));
    let token = CancelToken::new();
    token.cancel();

    let mut buf = AlignedBuffer::allocate(4096, 4096).unwrap();
    let mut list = BufferList::new(vec![IoVec::Read(buf.view())]);
    let err = engine::read_async_cancellable(&dev, 0, &mut list, &token)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectIoError::Cancelled));
    // Nothing was issued, nothing transferred
    assert_eq!(dev.read_calls(), 0);
}

#[tokio::test]
async fn uncancelled_token_is_transparent() {
    let content = patterned(4096);
    let dev = MemDevice::with_content(&content);
    let token = CancelToken::new();

    let mut buf = AlignedBuffer::allocate(4096, 4096).unwrap();
    let n = {
        let mut list = BufferList::new(vec![IoVec::Read(buf.view())]);
        engine::read_async_cancellable(&dev, 0, &mut list, &token)
            .await
            .unwrap()
    };
    assert_eq!(n, 4096);
    assert_eq!(buf.as_slice(), &content[..]);
}

#[tokio::test]
async fn cancelled_write_reports_cancelled() {
    let dev = MemDevice::new();
    let token = CancelToken::new();
    token.cancel();

    let data = [1u8; 64];
    let list = BufferList::new(vec![IoVec::Write(&data)]);
    let err = engine::write_async_cancellable(&dev, 0, &list, &token)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(dev.write_calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blocking_facade_works_inside_a_multi_thread_runtime() {
    let dev = MemDevice::with_content(&patterned(10_000));
    let pool = BufferPool::new(4096, 512, 1, 2).unwrap();

    // block_in_place path: the blocking façade may be called from a worker
    // thread of a multi-thread runtime
    let mut total = 0u64;
    let outcome = drive_read(&dev, &pool, 0, |chunk| total += chunk.len() as u64).unwrap();
    assert_eq!(total, outcome.bytes_transferred);
    assert_eq!(outcome.bytes_transferred, 10_000);
}
