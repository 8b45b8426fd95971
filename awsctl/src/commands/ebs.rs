//! EBS direct APIs
//!
//! https://docs.aws.amazon.com/ebs/latest/APIReference/API_Operations_Amazon_Elastic_Block_Store.html
use std::path::PathBuf;

use aws_sdk_ebs::{
  operation::{
    complete_snapshot::CompleteSnapshotOutput,
    get_snapshot_block::{builders::GetSnapshotBlockFluentBuilder, GetSnapshotBlockOutput},
    list_changed_blocks::ListChangedBlocksOutput, list_snapshot_blocks::ListSnapshotBlocksOutput,
    put_snapshot_block::PutSnapshotBlockOutput, start_snapshot::StartSnapshotOutput,
  },
  primitives::{ByteStream, DateTime, DateTimeFormat},
  types,
};
use base64::{engine::general_purpose, Engine as _};
use clap::{Args, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::KeyValue;
use crate::{
  confirm::{ConfirmArgs, Impact},
  error::CommandError,
  invoke::{Invocation, Operation, Paged, PagingArgs, SdkResultExt, SelectArgs},
  Session,
};

/// Size of a snapshot block; the only size the direct APIs accept
pub const BLOCK_SIZE: usize = 512 * 1024;

pub static START_SNAPSHOT: Operation = Operation {
  name: "StartSnapshot",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("VolumeSize"),
  required: &["VolumeSize"],
};

pub static COMPLETE_SNAPSHOT: Operation = Operation {
  name: "CompleteSnapshot",
  default_select: "Status",
  impact: Impact::Medium,
  target: Some("SnapshotId"),
  required: &["SnapshotId", "ChangedBlocksCount"],
};

pub static GET_SNAPSHOT_BLOCK: Operation = Operation {
  name: "GetSnapshotBlock",
  default_select: "*",
  impact: Impact::None,
  target: None,
  required: &["SnapshotId", "BlockIndex", "BlockToken"],
};

pub static LIST_CHANGED_BLOCKS: Operation = Operation {
  name: "ListChangedBlocks",
  default_select: "ChangedBlocks",
  impact: Impact::None,
  target: None,
  required: &["SecondSnapshotId"],
};

pub static LIST_SNAPSHOT_BLOCKS: Operation = Operation {
  name: "ListSnapshotBlocks",
  default_select: "Blocks",
  impact: Impact::None,
  target: None,
  required: &["SnapshotId"],
};

pub static PUT_SNAPSHOT_BLOCK: Operation = Operation {
  name: "PutSnapshotBlock",
  default_select: "*",
  impact: Impact::Medium,
  target: Some("SnapshotId"),
  required: &["SnapshotId", "BlockIndex"],
};

#[derive(Debug, Subcommand)]
pub enum EbsCommands {
  /// Create a new snapshot and put it in the pending state
  StartSnapshot(StartSnapshotInput),

  /// Seal and complete a snapshot after all blocks of data have been written to it
  CompleteSnapshot(CompleteSnapshotInput),

  /// Return the data in a block of a snapshot
  GetSnapshotBlock(GetSnapshotBlockInput),

  /// Return the blocks that differ between two snapshots of the same volume/lineage
  ListChangedBlocks(ListChangedBlocksInput),

  /// Return the blocks in a snapshot
  ListSnapshotBlocks(ListSnapshotBlocksInput),

  /// Write a block of data to a snapshot
  PutSnapshotBlock(PutSnapshotBlockInput),
}

impl EbsCommands {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    match self {
      EbsCommands::StartSnapshot(input) => input.exec(session).await,
      EbsCommands::CompleteSnapshot(input) => input.exec(session).await,
      EbsCommands::GetSnapshotBlock(input) => input.exec(session).await,
      EbsCommands::ListChangedBlocks(input) => input.exec(session).await,
      EbsCommands::ListSnapshotBlocks(input) => input.exec(session).await,
      EbsCommands::PutSnapshotBlock(input) => input.exec(session).await,
    }
  }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum ChecksumAlgorithm {
  #[default]
  #[value(name = "SHA256")]
  #[serde(rename = "SHA256")]
  Sha256,
}

impl From<ChecksumAlgorithm> for types::ChecksumAlgorithm {
  fn from(_: ChecksumAlgorithm) -> Self {
    types::ChecksumAlgorithm::from("SHA256")
  }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, Serialize, Deserialize)]
pub enum ChecksumAggregationMethod {
  #[default]
  #[value(name = "LINEAR")]
  #[serde(rename = "LINEAR")]
  Linear,
}

impl From<ChecksumAggregationMethod> for types::ChecksumAggregationMethod {
  fn from(_: ChecksumAggregationMethod) -> Self {
    types::ChecksumAggregationMethod::from("LINEAR")
  }
}

/// Base64 encoded SHA256 digest, the form the direct APIs exchange checksums in
pub fn checksum(data: &[u8]) -> String {
  general_purpose::STANDARD.encode(Sha256::digest(data))
}

fn timestamp(dt: &DateTime) -> Option<String> {
  dt.fmt(DateTimeFormat::DateTime).ok()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
  key: Option<String>,
  value: Option<String>,
}

fn tags(tags: &Option<Vec<types::Tag>>) -> Vec<Tag> {
  tags
    .iter()
    .flatten()
    .map(|t| Tag {
      key: t.key.clone(),
      value: t.value.clone(),
    })
    .collect()
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartSnapshotInput {
  /// The size of the volume, in GiB
  #[arg(long)]
  pub volume_size: i64,

  /// The ID of the parent snapshot; omit to start a full snapshot
  #[arg(long)]
  pub parent_snapshot_id: Option<String>,

  /// Tags to apply to the snapshot (KEY=VALUE, repeatable)
  #[arg(long = "tag")]
  pub tags: Vec<KeyValue>,

  /// A description for the snapshot
  #[arg(long)]
  pub description: Option<String>,

  /// A unique, case-sensitive identifier that ensures the request completes only once
  #[arg(long)]
  pub client_token: Option<String>,

  /// Encrypt the snapshot
  #[arg(long)]
  pub encrypted: bool,

  /// The ARN of the KMS key used to encrypt the snapshot
  #[arg(long)]
  pub kms_key_arn: Option<String>,

  /// Minutes the snapshot may stay pending before it moves to the error state
  #[arg(long)]
  pub timeout: Option<i32>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartSnapshot {
  snapshot_id: Option<String>,
  owner_id: Option<String>,
  parent_snapshot_id: Option<String>,
  description: Option<String>,
  status: Option<String>,
  start_time: Option<String>,
  volume_size: Option<i64>,
  block_size: Option<i32>,
  tags: Vec<Tag>,
  kms_key_arn: Option<String>,
  sse_type: Option<String>,
}

impl From<StartSnapshotOutput> for StartSnapshot {
  fn from(output: StartSnapshotOutput) -> Self {
    StartSnapshot {
      tags: tags(&output.tags),
      start_time: output.start_time.as_ref().and_then(timestamp),
      status: output.status.as_ref().map(|s| s.as_str().to_owned()),
      sse_type: output.sse_type.as_ref().map(|s| s.as_str().to_owned()),
      snapshot_id: output.snapshot_id,
      owner_id: output.owner_id,
      parent_snapshot_id: output.parent_snapshot_id,
      description: output.description,
      volume_size: output.volume_size,
      block_size: output.block_size,
      kms_key_arn: output.kms_key_arn,
    }
  }
}

impl StartSnapshotInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.ebs();
    let region = session.region();
    let mut inv = Invocation::new(&START_SNAPSHOT, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let tags = self
      .tags
      .iter()
      .map(|t| types::Tag::builder().key(&t.key).value(&t.value).build())
      .collect::<Vec<_>>();

    let request = client
      .start_snapshot()
      .volume_size(self.volume_size)
      .set_parent_snapshot_id(self.parent_snapshot_id.clone())
      .set_tags((!tags.is_empty()).then_some(tags))
      .set_description(self.description.clone())
      .set_client_token(self.client_token.clone())
      .set_encrypted(self.encrypted.then_some(true))
      .set_kms_key_arn(self.kms_key_arn.clone())
      .set_timeout(self.timeout);

    inv
      .call(async {
        request
          .send()
          .await
          .map(StartSnapshot::from)
          .or_command_error(&START_SNAPSHOT, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompleteSnapshotInput {
  /// The ID of the snapshot
  #[arg(long)]
  pub snapshot_id: String,

  /// The number of blocks that were written to the snapshot
  #[arg(long)]
  pub changed_blocks_count: i32,

  /// An aggregated Base-64 SHA256 checksum based on the checksums of each written block
  #[arg(long)]
  pub checksum: Option<String>,

  /// The algorithm used to generate the checksum
  #[arg(long, value_enum)]
  pub checksum_algorithm: Option<ChecksumAlgorithm>,

  /// The aggregation method used to generate the checksum
  #[arg(long, value_enum)]
  pub checksum_aggregation_method: Option<ChecksumAggregationMethod>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompleteSnapshot {
  status: Option<String>,
}

impl From<CompleteSnapshotOutput> for CompleteSnapshot {
  fn from(output: CompleteSnapshotOutput) -> Self {
    CompleteSnapshot {
      status: output.status.as_ref().map(|s| s.as_str().to_owned()),
    }
  }
}

impl CompleteSnapshotInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.ebs();
    let region = session.region();
    let mut inv = Invocation::new(&COMPLETE_SNAPSHOT, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    // An aggregated checksum implies the only algorithm and aggregation the service supports
    let (algorithm, aggregation) = match &self.checksum {
      Some(_) => (
        Some(self.checksum_algorithm.unwrap_or_default()),
        Some(self.checksum_aggregation_method.unwrap_or_default()),
      ),
      None => (self.checksum_algorithm, self.checksum_aggregation_method),
    };

    let request = client
      .complete_snapshot()
      .snapshot_id(&self.snapshot_id)
      .changed_blocks_count(self.changed_blocks_count)
      .set_checksum(self.checksum.clone())
      .set_checksum_algorithm(algorithm.map(Into::into))
      .set_checksum_aggregation_method(aggregation.map(Into::into));

    inv
      .call(async {
        request
          .send()
          .await
          .map(CompleteSnapshot::from)
          .or_command_error(&COMPLETE_SNAPSHOT, region.as_deref())
      })
      .await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSnapshotBlockInput {
  /// The ID of the snapshot containing the block
  #[arg(long)]
  pub snapshot_id: String,

  /// The block index of the block to read
  #[arg(long)]
  pub block_index: i32,

  /// The block token of the block, as returned by list-snapshot-blocks or list-changed-blocks
  #[arg(long)]
  pub block_token: String,

  /// Write the block data to this file instead of including it (base64 encoded) in the output
  #[arg(long)]
  pub out_file: Option<PathBuf>,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotBlock {
  data_length: Option<i32>,
  checksum: Option<String>,
  checksum_algorithm: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  block_data: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  out_file: Option<PathBuf>,
}

impl SnapshotBlock {
  /// Build the view from the response metadata and the collected block bytes
  fn new(output: &GetSnapshotBlockOutput, data: &[u8], out_file: Option<PathBuf>) -> Self {
    if let Some(expected) = &output.checksum {
      let actual = checksum(data);
      if &actual != expected {
        warn!("Block checksum mismatch: service reported {expected}, computed {actual}");
      }
    }

    SnapshotBlock {
      data_length: output.data_length,
      checksum: output.checksum.clone(),
      checksum_algorithm: output.checksum_algorithm.as_ref().map(|a| a.as_str().to_owned()),
      block_data: match out_file {
        Some(_) => None,
        None => Some(general_purpose::STANDARD.encode(data)),
      },
      out_file,
    }
  }
}

impl GetSnapshotBlockInput {
  /// Send the request and collect the block body, writing it to `--out-file` when given
  async fn read_block(
    &self,
    request: GetSnapshotBlockFluentBuilder,
    region: Option<&str>,
  ) -> Result<SnapshotBlock, CommandError> {
    let mut output = request
      .send()
      .await
      .or_command_error(&GET_SNAPSHOT_BLOCK, region)?;

    let body = std::mem::replace(&mut output.block_data, ByteStream::from_static(b""));
    let data = body
      .collect()
      .await
      .map_err(|e| CommandError::Transport {
        operation: GET_SNAPSHOT_BLOCK.name,
        message: e.to_string(),
      })?
      .into_bytes();

    if let Some(path) = &self.out_file {
      tokio::fs::write(path, &data).await?;
      debug!("Wrote {} bytes to {}", data.len(), path.display());
    }

    Ok(SnapshotBlock::new(&output, &data, self.out_file.clone()))
  }

  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.ebs();
    let region = session.region();
    let inv = Invocation::new(&GET_SNAPSHOT_BLOCK, session.shell(), &self.select, self)?;

    let request = client
      .get_snapshot_block()
      .snapshot_id(&self.snapshot_id)
      .block_index(self.block_index)
      .block_token(&self.block_token);

    inv.call(self.read_block(request, region.as_deref())).await
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListChangedBlocksInput {
  /// The ID of the first snapshot; omit to list all blocks written to the second snapshot
  #[arg(long)]
  pub first_snapshot_id: Option<String>,

  /// The ID of the second snapshot
  #[arg(long)]
  pub second_snapshot_id: String,

  /// The maximum number of blocks to return per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// The block index from which the comparison should start
  #[arg(long)]
  pub starting_block_index: Option<i32>,

  #[command(flatten)]
  #[serde(flatten)]
  pub paging: PagingArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangedBlock {
  block_index: Option<i32>,
  first_block_token: Option<String>,
  second_block_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChangedBlocks {
  changed_blocks: Vec<ChangedBlock>,
  expiry_time: Option<String>,
  volume_size: Option<i64>,
  block_size: Option<i32>,
  next_token: Option<String>,
}

impl From<ListChangedBlocksOutput> for ChangedBlocks {
  fn from(output: ListChangedBlocksOutput) -> Self {
    ChangedBlocks {
      changed_blocks: output
        .changed_blocks
        .unwrap_or_default()
        .into_iter()
        .map(|b| ChangedBlock {
          block_index: b.block_index,
          first_block_token: b.first_block_token,
          second_block_token: b.second_block_token,
        })
        .collect(),
      expiry_time: output.expiry_time.as_ref().and_then(timestamp),
      volume_size: output.volume_size,
      block_size: output.block_size,
      next_token: output.next_token,
    }
  }
}

impl Paged for ChangedBlocks {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl ListChangedBlocksInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.ebs();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&LIST_CHANGED_BLOCKS, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .list_changed_blocks()
          .set_first_snapshot_id(self.first_snapshot_id.clone())
          .second_snapshot_id(&self.second_snapshot_id)
          .set_max_results(self.max_results)
          .set_starting_block_index(self.starting_block_index)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(ChangedBlocks::from)
            .or_command_error(&LIST_CHANGED_BLOCKS, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListSnapshotBlocksInput {
  /// The ID of the snapshot from which to get block indexes and block tokens
  #[arg(long)]
  pub snapshot_id: String,

  /// The maximum number of blocks to return per page
  #[arg(long)]
  pub max_results: Option<i32>,

  /// The block index from which the list should start
  #[arg(long)]
  pub starting_block_index: Option<i32>,

  #[command(flatten)]
  #[serde(flatten)]
  pub paging: PagingArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
  block_index: Option<i32>,
  block_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotBlocks {
  blocks: Vec<Block>,
  expiry_time: Option<String>,
  volume_size: Option<i64>,
  block_size: Option<i32>,
  next_token: Option<String>,
}

impl From<ListSnapshotBlocksOutput> for SnapshotBlocks {
  fn from(output: ListSnapshotBlocksOutput) -> Self {
    SnapshotBlocks {
      blocks: output
        .blocks
        .unwrap_or_default()
        .into_iter()
        .map(|b| Block {
          block_index: b.block_index,
          block_token: b.block_token,
        })
        .collect(),
      expiry_time: output.expiry_time.as_ref().and_then(timestamp),
      volume_size: output.volume_size,
      block_size: output.block_size,
      next_token: output.next_token,
    }
  }
}

impl Paged for SnapshotBlocks {
  fn next_token(&self) -> Option<&str> {
    self.next_token.as_deref()
  }
}

impl ListSnapshotBlocksInput {
  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.ebs();
    let region = session.region();
    let region = region.as_deref();
    let inv = Invocation::new(&LIST_SNAPSHOT_BLOCKS, session.shell(), &self.select, self)?;

    inv
      .paginate(&self.paging, |token| {
        let request = client
          .list_snapshot_blocks()
          .snapshot_id(&self.snapshot_id)
          .set_max_results(self.max_results)
          .set_starting_block_index(self.starting_block_index)
          .set_next_token(token);
        async move {
          request
            .send()
            .await
            .map(SnapshotBlocks::from)
            .or_command_error(&LIST_SNAPSHOT_BLOCKS, region)
        }
      })
      .await?;

    Ok(())
  }
}

#[derive(Args, Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutSnapshotBlockInput {
  /// The ID of the snapshot
  #[arg(long)]
  pub snapshot_id: String,

  /// The block index of the block in which to write the data
  #[arg(long)]
  pub block_index: i32,

  /// File containing the data to write to the block
  #[arg(long)]
  pub block_data: PathBuf,

  /// The size of the data to write, in bytes; defaults to the size of the file
  #[arg(long)]
  pub data_length: Option<i32>,

  /// The progress of the write process, as a percentage
  #[arg(long)]
  pub progress: Option<i32>,

  /// Base-64 SHA256 checksum of the data; computed from the file when omitted
  #[arg(long)]
  pub checksum: Option<String>,

  /// The algorithm used to generate the checksum
  #[arg(long, value_enum, default_value_t)]
  pub checksum_algorithm: ChecksumAlgorithm,

  #[command(flatten)]
  #[serde(skip)]
  pub select: SelectArgs,

  #[command(flatten)]
  #[serde(skip)]
  pub confirm: ConfirmArgs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutSnapshotBlock {
  checksum: Option<String>,
  checksum_algorithm: Option<String>,
}

impl From<PutSnapshotBlockOutput> for PutSnapshotBlock {
  fn from(output: PutSnapshotBlockOutput) -> Self {
    PutSnapshotBlock {
      checksum: output.checksum,
      checksum_algorithm: output.checksum_algorithm.as_ref().map(|a| a.as_str().to_owned()),
    }
  }
}

/// The block payload with its length and checksum resolved
#[derive(Debug)]
struct BlockPayload {
  data: Vec<u8>,
  data_length: i32,
  checksum: String,
}

impl PutSnapshotBlockInput {
  fn payload(&self, data: Vec<u8>) -> Result<BlockPayload, CommandError> {
    let data_length = match self.data_length {
      Some(len) => len,
      None => i32::try_from(data.len())
        .map_err(|_| CommandError::Validation(format!("{} is too large for a block", self.block_data.display())))?,
    };

    if data.len() != BLOCK_SIZE {
      warn!(
        "{} is {} bytes; snapshot blocks must be {BLOCK_SIZE} bytes",
        self.block_data.display(),
        data.len()
      );
    }

    let checksum = match &self.checksum {
      Some(checksum) => checksum.to_owned(),
      None => checksum(&data),
    };

    Ok(BlockPayload {
      data,
      data_length,
      checksum,
    })
  }

  pub async fn exec(&self, session: &mut Session) -> Result<(), CommandError> {
    let client = session.ebs();
    let region = session.region();
    let mut inv = Invocation::new(&PUT_SNAPSHOT_BLOCK, session.shell(), &self.select, self)?;
    if !inv.should_process(&self.confirm)? {
      return Ok(());
    }

    let payload = self.payload(tokio::fs::read(&self.block_data).await?)?;

    let request = client
      .put_snapshot_block()
      .snapshot_id(&self.snapshot_id)
      .block_index(self.block_index)
      .data_length(payload.data_length)
      .set_progress(self.progress)
      .checksum(payload.checksum)
      .checksum_algorithm(self.checksum_algorithm.into())
      .block_data(ByteStream::from(payload.data));

    inv
      .call(async {
        request
          .send()
          .await
          .map(PutSnapshotBlock::from)
          .or_command_error(&PUT_SNAPSHOT_BLOCK, region.as_deref())
      })
      .await
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write;

  use clap::Parser;
  use serde_json::{json, Value};

  use super::*;
  use crate::{select::Selector, Cli, Commands};

  fn default_projection<T: Serialize>(op: &Operation, view: &T) -> Vec<Value> {
    let select = op.default_select.parse::<Selector>().unwrap();
    select.project(&serde_json::to_value(view).unwrap(), &json!({}))
  }

  #[test]
  fn checksum_is_base64_sha256() {
    assert_eq!(checksum(b""), "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=");
    assert_eq!(checksum(b"hello world"), "uU0nuZNNPgilLlLX2n2r+sSE7+N6U4DukIj3rOLvzek=");
  }

  #[test]
  fn complete_snapshot_selects_status() {
    let output = CompleteSnapshotOutput::builder().status(types::Status::Completed).build();
    let result = default_projection(&COMPLETE_SNAPSHOT, &CompleteSnapshot::from(output));

    assert_eq!(result, vec![json!("completed")]);
  }

  #[test]
  fn list_snapshot_blocks_selects_blocks() {
    let output = ListSnapshotBlocksOutput::builder()
      .blocks(types::Block::builder().block_index(0).block_token("tok-0").build())
      .blocks(types::Block::builder().block_index(3).block_token("tok-3").build())
      .block_size(524288)
      .next_token("next")
      .build();
    let view = SnapshotBlocks::from(output);

    assert_eq!(view.next_token(), Some("next"));
    assert_eq!(
      default_projection(&LIST_SNAPSHOT_BLOCKS, &view),
      vec![
        json!({"BlockIndex": 0, "BlockToken": "tok-0"}),
        json!({"BlockIndex": 3, "BlockToken": "tok-3"})
      ]
    );
  }

  #[test]
  fn list_changed_blocks_selects_changed_blocks() {
    let output = ListChangedBlocksOutput::builder()
      .changed_blocks(
        types::ChangedBlock::builder()
          .block_index(9)
          .first_block_token("a")
          .second_block_token("b")
          .build(),
      )
      .build();
    let view = ChangedBlocks::from(output);

    assert_eq!(view.next_token(), None);
    assert_eq!(
      default_projection(&LIST_CHANGED_BLOCKS, &view),
      vec![json!({"BlockIndex": 9, "FirstBlockToken": "a", "SecondBlockToken": "b"})]
    );
  }

  #[test]
  fn start_snapshot_emits_whole_response() {
    let output = StartSnapshotOutput::builder()
      .snapshot_id("snap-0123")
      .status(types::Status::Pending)
      .volume_size(8)
      .tags(types::Tag::builder().key("team").value("storage").build())
      .build();
    let result = default_projection(&START_SNAPSHOT, &StartSnapshot::from(output));

    assert_eq!(result.len(), 1);
    assert_eq!(result[0]["SnapshotId"], "snap-0123");
    assert_eq!(result[0]["Status"], "pending");
    assert_eq!(result[0]["Tags"], json!([{"Key": "team", "Value": "storage"}]));
  }

  #[test]
  fn snapshot_block_inlines_data_without_out_file() {
    let data = b"block";
    let output = GetSnapshotBlockOutput::builder()
      .data_length(5)
      .checksum(checksum(data))
      .build();
    let view = serde_json::to_value(SnapshotBlock::new(&output, data, None)).unwrap();

    assert_eq!(view["BlockData"], general_purpose::STANDARD.encode(data));
    assert_eq!(view["DataLength"], 5);
    assert!(view.get("OutFile").is_none());
  }

  #[test]
  fn snapshot_block_omits_data_with_out_file() {
    let output = GetSnapshotBlockOutput::builder().data_length(5).build();
    let view = serde_json::to_value(SnapshotBlock::new(&output, b"block", Some(PathBuf::from("/tmp/b")))).unwrap();

    assert!(view.get("BlockData").is_none());
    assert_eq!(view["OutFile"], "/tmp/b");
  }

  fn put_input(args: &[&str]) -> PutSnapshotBlockInput {
    let cli = Cli::parse_from(
      ["awsctl", "ebs", "put-snapshot-block", "--snapshot-id", "snap-1", "--block-index", "4"]
        .iter()
        .chain(args),
    );
    match cli.command {
      Commands::Ebs(EbsCommands::PutSnapshotBlock(input)) => input,
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn put_payload_defaults_length_and_checksum() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let data = vec![7u8; BLOCK_SIZE];
    file.write_all(&data).unwrap();
    let path = file.path().to_str().unwrap().to_owned();

    let input = put_input(&["--block-data", path.as_str()]);
    let payload = input.payload(std::fs::read(&path).unwrap()).unwrap();

    assert_eq!(payload.data_length, BLOCK_SIZE as i32);
    assert_eq!(payload.checksum, checksum(&data));
  }

  #[test]
  fn put_payload_keeps_explicit_values() {
    let input = put_input(&["--block-data", "/dev/null", "--data-length", "10", "--checksum", "abc="]);
    let payload = input.payload(vec![0u8; 10]).unwrap();

    assert_eq!(payload.data_length, 10);
    assert_eq!(payload.checksum, "abc=");
  }

  #[test]
  fn paging_flags_serialize_as_parameters() {
    let cli = Cli::parse_from([
      "awsctl",
      "ebs",
      "list-snapshot-blocks",
      "--snapshot-id",
      "snap-1",
      "--next-token",
      "tok",
    ]);
    let input = match cli.command {
      Commands::Ebs(EbsCommands::ListSnapshotBlocks(input)) => input,
      other => panic!("unexpected command {other:?}"),
    };
    let params = serde_json::to_value(&input).unwrap();

    assert_eq!(params["SnapshotId"], "snap-1");
    assert_eq!(params["NextToken"], "tok");
    assert!(input.paging.user_controlled());
  }
}
