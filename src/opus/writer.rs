// OpusHead/OpusTags page emission
//
// Both header packets are submitted with a forced flush so each one is sealed
// into its own page: page 0 carries OpusHead, page 1 carries OpusTags. Either
// page failing to come back as exactly one page aborts the whole write; the
// output sink is left as-is and must be discarded by the caller.

use std::io::Write;

use tracing::{debug, warn};

use crate::error::{HeaderError, WriteStage};
use crate::ogg::Packetizer;
use crate::opus::{CommentHeader, IdentificationHeader, StreamParameters};
use crate::utils::io::write_checked;

/// Packet number of both header packets; each is the only packet on its page
const HEADER_PACKET_NO: u64 = 0;

/// Stage labels for one header page
struct PageStages {
    flush: WriteStage,
    append: WriteStage,
}

const HEAD_PAGE: PageStages = PageStages {
    flush: WriteStage::HeadPageFlush,
    append: WriteStage::HeadPageAppend,
};

const TAGS_PAGE: PageStages = PageStages {
    flush: WriteStage::TagsPageFlush,
    append: WriteStage::TagsPageAppend,
};

/// Emit the identification and comment header pages for a new stream
pub fn write_headers<P, W>(
    params: &StreamParameters,
    packetizer: &mut P,
    output: &mut W,
) -> Result<(), HeaderError>
where
    P: Packetizer + ?Sized,
    W: Write + ?Sized,
{
    let payload = IdentificationHeader::from_params(params).to_bytes()?;
    emit_header_page(&payload, packetizer, output, &HEAD_PAGE)?;
    debug!(
        channels = params.channels,
        sample_rate = params.sample_rate,
        bytes = payload.len(),
        "wrote OpusHead page"
    );

    let payload = CommentHeader::vendor_only().to_bytes()?;
    emit_header_page(&payload, packetizer, output, &TAGS_PAGE)?;
    debug!(bytes = payload.len(), "wrote OpusTags page");

    Ok(())
}

/// Seal one payload into exactly one page and append it to the sink
fn emit_header_page<P, W>(
    payload: &[u8],
    packetizer: &mut P,
    output: &mut W,
    stages: &PageStages,
) -> Result<(), HeaderError>
where
    P: Packetizer + ?Sized,
    W: Write + ?Sized,
{
    let packet = packetizer.wrap(payload, HEADER_PACKET_NO);
    let pages = packetizer
        .submit(packet, true)
        .map_err(|e| HeaderError::underlying(stages.flush, e))?;

    if pages.page_count != 1 {
        warn!(stage = %stages.flush, count = pages.page_count, "header flush did not produce one page");
        return Err(HeaderError::UnexpectedPageCount {
            stage: stages.flush,
            count: pages.page_count,
        });
    }

    write_checked(output, &pages.bytes, stages.append)
}
