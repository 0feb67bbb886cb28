use self::codec::Codec;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};

pub mod codec;
pub mod service;
pub mod types;

pub use service::ConsoleService;

pub fn framed<R, W>(reader: R, writer: W) -> (FramedRead<R, Codec>, FramedWrite<W, Codec>)
where
    R: AsyncRead,
    W: AsyncWrite,
{
    (
        FramedRead::new(reader, Codec::default()),
        FramedWrite::new(writer, Codec::default()),
    )
}
