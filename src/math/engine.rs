use crossbeam::channel::{self, Receiver, Sender};
use glam::Vec3;
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::validation::validate_request;
use crate::math::mesh::TriangleMesh;
use crate::math::surface::{AngleUnit, SurfaceKind};
use crate::math::tessellator::{ParamDomain, TessellationConfig, Tessellator};

/// Everything needed to rebuild a mesh from scratch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshRequest {
    pub kind: SurfaceKind,
    pub unit: AngleUnit,
    pub scale: (f64, f64, f64),
    pub domain: ParamDomain,
    pub tessellation: TessellationConfig,
}

pub struct SurfaceMesh {
    pub mesh: TriangleMesh,
    pub bounds: Option<(Vec3, Vec3)>,
    pub request: MeshRequest,
    pub elapsed: Duration,
}

pub enum MeshCommand {
    Tessellate(MeshRequest),
    Stop,
}

pub enum MeshResult {
    Mesh(SurfaceMesh),
    Error(String),
}

/// Runs one request at a time on a dedicated thread.
pub struct MeshEngine {
    tx_cmd: Sender<MeshCommand>,
    rx_result: Receiver<MeshResult>,
    last_error: Arc<Mutex<Option<String>>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl MeshEngine {
    pub fn new() -> Self {
        let (tx_cmd, rx_cmd) = channel::unbounded::<MeshCommand>();
        let (tx_result, rx_result) = channel::bounded::<MeshResult>(2);
        let last_error = Arc::new(Mutex::new(None));
        let last_error_clone = Arc::clone(&last_error);

        let thread_handle = thread::Builder::new()
            .name("mesh-engine".into())
            .spawn(move || {
                mesh_thread(rx_cmd, tx_result, last_error_clone);
            })
            .ok();

        if thread_handle.is_none() {
            warn!("failed to spawn mesh thread, tessellation requests will be ignored");
        }

        Self {
            tx_cmd,
            rx_result,
            last_error,
            thread_handle,
        }
    }

    /// Queue a rebuild. Returns `false` when the worker is gone and the
    /// request was dropped.
    pub fn request(&self, request: MeshRequest) -> bool {
        if self.tx_cmd.send(MeshCommand::Tessellate(request)).is_err() {
            warn!("mesh thread is not running, dropping tessellation request");
            return false;
        }
        true
    }

    pub fn try_recv_result(&self) -> Option<MeshResult> {
        self.rx_result.try_recv().ok()
    }

    /// Blocks until the worker answers or `timeout` elapses.
    pub fn recv_result_timeout(&self, timeout: Duration) -> Option<MeshResult> {
        self.rx_result.recv_timeout(timeout).ok()
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    pub fn stop(&self) {
        if self.tx_cmd.send(MeshCommand::Stop).is_err() {
            warn!("mesh thread already stopped");
        }
    }
}

impl Default for MeshEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MeshEngine {
    fn drop(&mut self) {
        let _ = self.tx_cmd.send(MeshCommand::Stop);
        if let Some(handle) = self.thread_handle.take() {
            // Unread results would leave the worker blocked on a full channel.
            while !handle.is_finished() {
                let _ = self.rx_result.recv_timeout(Duration::from_millis(10));
            }
            let _ = handle.join();
        }
    }
}

fn mesh_thread(
    rx_cmd: Receiver<MeshCommand>,
    tx_result: Sender<MeshResult>,
    last_error: Arc<Mutex<Option<String>>>,
) {
    loop {
        let mut cmd = match rx_cmd.recv() {
            Ok(c) => c,
            Err(_) => return,
        };

        // Only the newest queued request matters; a slider drag can queue dozens.
        while let Ok(next) = rx_cmd.try_recv() {
            if matches!(cmd, MeshCommand::Stop) {
                break;
            }
            cmd = next;
        }

        match cmd {
            MeshCommand::Tessellate(request) => {
                *last_error.lock() = None;

                match build_mesh(request) {
                    Ok(mesh) => {
                        if tx_result.send(MeshResult::Mesh(mesh)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        warn!("rejected tessellation request: {e}");
                        *last_error.lock() = Some(e.clone());
                        if tx_result.send(MeshResult::Error(e)).is_err() {
                            return;
                        }
                    }
                }
            }
            MeshCommand::Stop => {
                debug!("mesh thread stopping");
                return;
            }
        }
    }
}

pub fn build_mesh(request: MeshRequest) -> Result<SurfaceMesh, String> {
    validate_request(&request.tessellation, &request.domain).map_err(|e| e.to_string())?;

    let start = Instant::now();
    let (a, b, c) = request.scale;
    let surface = request.kind.build(a, b, c, request.unit);
    let mesh = Tessellator::new(request.tessellation).tessellate(surface.as_ref(), &request.domain);
    let elapsed = start.elapsed();

    mesh.validate().map_err(|e| e.to_string())?;

    info!(
        surface = request.kind.label(),
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        ms = elapsed.as_secs_f64() * 1000.0,
        "mesh ready"
    );

    Ok(SurfaceMesh {
        bounds: mesh.bounds(),
        mesh,
        request,
        elapsed,
    })
}
