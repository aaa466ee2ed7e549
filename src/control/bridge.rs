//! JSON-lines bridge to the agent multiplexer.
//!
//! The bridge listens on a local Unix socket in front of the multiplexer and
//! exchanges one JSON object per line in each direction. Requests are
//! `BridgeRequest`; everything coming back is a `BridgeMessage`.

use super::{ControlEvent, Instance, MeasurementControl, TraceMethod, TraceOptions};
use crate::capture::CaptureRecord;
use crate::error::TracerError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::IpAddr;
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Client to bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BridgeRequest {
    List,
    Trace {
        instance: u64,
        dst: IpAddr,
        method: TraceMethod,
        wait_timeout_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wait_probe_ms: Option<u64>,
        ptr: bool,
    },
    /// The instance gets no work in this run
    DoneInstance {
        instance: u64,
    },
    Done,
}

/// Bridge to client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BridgeMessage {
    Instances { instances: Vec<Instance> },
    Result { instance: Instance, record: CaptureRecord },
    Eof { instance: Instance },
    Error { message: String },
    /// All agents have finished
    Finished,
}

/// `MeasurementControl` over a JSON-lines Unix socket bridge.
pub struct MuxBridgeControl {
    reader: BufReader<UnixStream>,
    writer: UnixStream,
    pending: String,
    live: HashSet<u64>,
    done_sent: bool,
    finished: bool,
}

impl MuxBridgeControl {
    /// Connect to the bridge socket at `path`.
    pub fn connect(path: &Path) -> Result<Self, TracerError> {
        let stream = UnixStream::connect(path).map_err(|e| {
            TracerError::Control(format!("Failed to connect to mux at {:?}: {}", path, e))
        })?;
        let writer = stream.try_clone()?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            pending: String::new(),
            live: HashSet::new(),
            done_sent: false,
            finished: false,
        })
    }

    fn send(&mut self, request: &BridgeRequest) -> Result<(), TracerError> {
        let mut line = serde_json::to_vec(request)?;
        line.push(b'\n');
        self.writer
            .write_all(&line)
            .map_err(|e| TracerError::Control(format!("Failed to send to mux: {}", e)))?;
        Ok(())
    }

    /// Read one message, or `None` if `timeout` elapsed first.
    fn read_message(&mut self, timeout: Duration) -> Result<Option<BridgeMessage>, TracerError> {
        let timeout = timeout.max(Duration::from_millis(1));
        self.reader.get_ref().set_read_timeout(Some(timeout))?;
        match self.reader.read_line(&mut self.pending) {
            Ok(0) => {
                debug!("Mux closed the connection");
                self.finished = true;
                Ok(None)
            }
            Ok(_) => {
                let line = std::mem::take(&mut self.pending);
                let message = serde_json::from_str(line.trim_end())
                    .map_err(|e| TracerError::Control(format!("Bad message from mux: {}", e)))?;
                Ok(Some(message))
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(None),
            Err(e) => Err(TracerError::Control(format!("Failed to read from mux: {}", e))),
        }
    }
}

impl MeasurementControl for MuxBridgeControl {
    fn instances(&mut self) -> Result<Vec<Instance>, TracerError> {
        self.send(&BridgeRequest::List)?;
        loop {
            match self.read_message(Duration::from_secs(30))? {
                Some(BridgeMessage::Instances { instances }) => {
                    self.live = instances.iter().map(|i| i.id).collect();
                    return Ok(instances);
                }
                Some(BridgeMessage::Error { message }) => return Err(TracerError::Control(message)),
                Some(other) => warn!(message = ?other, "Ignoring message while listing agents"),
                None => {
                    return Err(TracerError::Control(
                        "Mux did not list agents in time".to_string(),
                    ))
                }
            }
        }
    }

    fn do_trace(
        &mut self,
        instance: &Instance,
        dst: IpAddr,
        options: &TraceOptions,
    ) -> Result<(), TracerError> {
        self.send(&BridgeRequest::Trace {
            instance: instance.id,
            dst,
            method: options.method,
            wait_timeout_ms: options.wait_timeout.as_millis() as u64,
            wait_probe_ms: options.wait_probe.map(|d| d.as_millis() as u64),
            ptr: options.ptr,
        })
    }

    fn finish_instance(&mut self, instance: &Instance) -> Result<(), TracerError> {
        self.live.remove(&instance.id);
        self.send(&BridgeRequest::DoneInstance {
            instance: instance.id,
        })
    }

    fn done(&mut self) -> Result<(), TracerError> {
        self.done_sent = true;
        self.send(&BridgeRequest::Done)
    }

    fn is_done(&self) -> bool {
        self.finished || (self.done_sent && self.live.is_empty())
    }

    fn poll(&mut self, timeout: Duration) -> Result<Option<ControlEvent>, TracerError> {
        let deadline = Instant::now().checked_add(timeout);
        while !self.finished {
            let remaining = deadline.map_or(timeout, |d| d.saturating_duration_since(Instant::now()));
            match self.read_message(remaining)? {
                Some(BridgeMessage::Result { instance, record }) => {
                    return Ok(Some(ControlEvent::from_record(instance, record)));
                }
                Some(BridgeMessage::Eof { instance }) => {
                    self.live.remove(&instance.id);
                    return Ok(Some(ControlEvent::EndOfWork { instance }));
                }
                Some(BridgeMessage::Error { message }) => return Err(TracerError::Control(message)),
                Some(BridgeMessage::Finished) => self.finished = true,
                Some(BridgeMessage::Instances { instances }) => {
                    debug!(count = instances.len(), "Ignoring agent listing during drain");
                    if remaining.is_zero() {
                        return Ok(None);
                    }
                }
                None => return Ok(None),
            }
        }
        Ok(None)
    }
}
