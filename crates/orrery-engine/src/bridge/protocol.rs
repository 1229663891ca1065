/// Shared scene buffer layout.
/// Must stay in sync with the TypeScript renderer's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 8 floats]
/// [Bodies: max_bodies × 8 floats]
/// [Paths: max_bodies × max_path_vertices × 3 floats]
/// ```
///
/// Positions are camera-relative so they survive the narrowing to f32. Day
/// numbers are split into whole and fractional parts for the same reason.
/// Capacities are written into the header on every write; the renderer
/// reads them from there to compute offsets.

use bytemuck::{Pod, Zeroable};
use glam::DVec3;

use crate::api::config::SessionConfig;
use crate::api::types::ModeName;
use crate::components::body::Body;
use crate::renderer::camera::Camera3D;
use crate::settings::Settings;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_BODIES: usize = 2;
pub const HEADER_BODY_COUNT: usize = 3;
pub const HEADER_MAX_PATH_VERTICES: usize = 4;
pub const HEADER_MODE: usize = 5;
pub const HEADER_SPEED: usize = 6;
pub const HEADER_DAY_WHOLE: usize = 7;
pub const HEADER_DAY_FRACTION: usize = 8;
pub const HEADER_FLAGS: usize = 9;
pub const HEADER_SIZE_FACTOR: usize = 10;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Flag bits in `HEADER_FLAGS`.
pub const FLAG_LABELS: u32 = 1;
pub const FLAG_ORBITS: u32 = 1 << 1;
pub const FLAG_STARS: u32 = 1 << 2;
pub const FLAG_AMBIENT_LIGHT: u32 = 1 << 3;

/// Floats in the camera section: orientation xyzw, fov, near, far, pad.
pub const CAMERA_FLOATS: usize = 8;

/// Floats per body record (wire format, never changes).
pub const BODY_FLOATS: usize = 8;

/// Floats per orbit path vertex: x, y, z.
pub const PATH_VERTEX_FLOATS: usize = 3;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraRecord {
    pub orientation: [f32; 4],
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub _pad: f32,
}

/// One body as the renderer sees it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BodyRecord {
    /// Position relative to the camera.
    pub offset: [f32; 3],
    pub radius: f32,
    pub rotation: f32,
    /// 1.0 when the label is shown.
    pub label_visible: f32,
    pub label_order: f32,
    pub path_vertex_count: f32,
}

impl BodyRecord {
    pub fn from_body(body: &Body, eye: DVec3, max_path_vertices: usize) -> Self {
        let offset = (body.position - eye).as_vec3();
        let path_vertex_count = body
            .orbit
            .as_ref()
            .map_or(0, |p| p.vertices().len().min(max_path_vertices));
        Self {
            offset: offset.to_array(),
            radius: body.radius as f32,
            rotation: body.rotation as f32,
            label_visible: if body.label.visible { 1.0 } else { 0.0 },
            label_order: body.label.order as f32,
            path_vertex_count: path_vertex_count as f32,
        }
    }
}

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub max_bodies: usize,
    pub max_path_vertices: usize,

    pub camera_offset: usize,
    pub body_data_offset: usize,
    pub body_data_floats: usize,
    pub path_data_offset: usize,
    pub path_data_floats: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl SceneLayout {
    pub fn new(max_bodies: usize, max_path_vertices: usize) -> Self {
        let camera_offset = HEADER_FLOATS;
        let body_data_offset = camera_offset + CAMERA_FLOATS;
        let body_data_floats = max_bodies * BODY_FLOATS;
        let path_data_offset = body_data_offset + body_data_floats;
        let path_data_floats = max_bodies * max_path_vertices * PATH_VERTEX_FLOATS;
        let buffer_total_floats = path_data_offset + path_data_floats;

        Self {
            max_bodies,
            max_path_vertices,
            camera_offset,
            body_data_offset,
            body_data_floats,
            path_data_offset,
            path_data_floats,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.max_bodies, config.orbit_path_samples)
    }

    /// Start of body slot `index`'s path vertices.
    pub fn path_offset(&self, index: usize) -> usize {
        self.path_data_offset + index * self.max_path_vertices * PATH_VERTEX_FLOATS
    }
}

/// Per-frame values that go into the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHeader {
    pub frame: u64,
    pub mode: Option<ModeName>,
    pub speed: f64,
    pub day_number: f64,
    pub size_factor: f64,
}

/// Wire index of a mode; -1 when none is active.
pub fn mode_index(mode: Option<ModeName>) -> f32 {
    match mode {
        None => -1.0,
        Some(ModeName::Menu) => 0.0,
        Some(ModeName::Orbit) => 1.0,
        Some(ModeName::PointerLock) => 2.0,
        Some(ModeName::Auto) => 3.0,
    }
}

pub fn flags(settings: &Settings) -> u32 {
    let mut flags = 0;
    if settings.labels {
        flags |= FLAG_LABELS;
    }
    if settings.orbits {
        flags |= FLAG_ORBITS;
    }
    if settings.stars {
        flags |= FLAG_STARS;
    }
    if settings.ambient_light {
        flags |= FLAG_AMBIENT_LIGHT;
    }
    flags
}

/// The flat f32 buffer handed to the renderer.
#[derive(Debug, Clone)]
pub struct SceneBuffer {
    layout: SceneLayout,
    data: Vec<f32>,
    body_count: usize,
}

impl SceneBuffer {
    pub fn new(layout: SceneLayout) -> Self {
        Self {
            data: vec![0.0; layout.buffer_total_floats],
            layout,
            body_count: 0,
        }
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn body_count(&self) -> usize {
        self.body_count
    }

    /// Body records written by the last [`write`](Self::write).
    pub fn bodies(&self) -> &[BodyRecord] {
        let start = self.layout.body_data_offset;
        let floats = &self.data[start..start + self.body_count * BODY_FLOATS];
        bytemuck::cast_slice(floats)
    }

    /// Rewrite the whole buffer. Bodies past `max_bodies` are dropped with a
    /// warning.
    pub fn write(&mut self, header: FrameHeader, settings: &Settings, camera: &Camera3D, bodies: &[Body]) {
        let layout = &self.layout;
        let total = bodies.len();
        if total > layout.max_bodies {
            log::warn!("scene buffer: {} bodies, only {} slots", total, layout.max_bodies);
        }

        let eye = camera.position;
        let mut count = 0;
        for (i, body) in bodies.iter().take(layout.max_bodies).enumerate() {
            let record = BodyRecord::from_body(body, eye, layout.max_path_vertices);
            let at = layout.body_data_offset + i * BODY_FLOATS;
            self.data[at..at + BODY_FLOATS].copy_from_slice(bytemuck::cast_slice(&[record]));

            let mut at = layout.path_offset(i);
            if let Some(path) = &body.orbit {
                for v in path.vertices().iter().take(layout.max_path_vertices) {
                    let rel = (*v - eye).as_vec3();
                    self.data[at..at + PATH_VERTEX_FLOATS].copy_from_slice(&rel.to_array());
                    at += PATH_VERTEX_FLOATS;
                }
            }
            count += 1;
        }
        self.body_count = count;

        let camera_record = CameraRecord {
            orientation: camera.orientation.as_quat().to_array(),
            fov: camera.fov,
            near: camera.near,
            far: camera.far,
            _pad: 0.0,
        };
        let at = layout.camera_offset;
        self.data[at..at + CAMERA_FLOATS].copy_from_slice(bytemuck::cast_slice(&[camera_record]));

        let whole = header.day_number.floor();
        let h = &mut self.data[..HEADER_FLOATS];
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_FRAME_COUNTER] = header.frame as f32;
        h[HEADER_MAX_BODIES] = layout.max_bodies as f32;
        h[HEADER_BODY_COUNT] = count as f32;
        h[HEADER_MAX_PATH_VERTICES] = layout.max_path_vertices as f32;
        h[HEADER_MODE] = mode_index(header.mode);
        h[HEADER_SPEED] = header.speed as f32;
        h[HEADER_DAY_WHOLE] = whole as f32;
        h[HEADER_DAY_FRACTION] = (header.day_number - whole) as f32;
        h[HEADER_FLAGS] = flags(settings) as f32;
        h[HEADER_SIZE_FACTOR] = header.size_factor as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyId;
    use crate::components::body::{BodyCategory, BodyDesc};
    use crate::components::orbit_path::OrbitPath;
    use crate::ephemeris::KeplerEphemeris;

    fn header() -> FrameHeader {
        FrameHeader {
            frame: 7,
            mode: Some(ModeName::Orbit),
            speed: 0.5,
            day_number: 2451545.25,
            size_factor: 1.0,
        }
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = SceneLayout::new(10, 4);
        assert_eq!(layout.camera_offset, HEADER_FLOATS);
        assert_eq!(layout.body_data_offset, HEADER_FLOATS + CAMERA_FLOATS);
        assert_eq!(layout.path_data_offset, layout.body_data_offset + 10 * BODY_FLOATS);
        assert_eq!(layout.path_offset(2), layout.path_data_offset + 2 * 4 * 3);
        assert_eq!(layout.buffer_total_floats, layout.path_data_offset + 10 * 4 * 3);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn default_config_layout() {
        let layout = SceneLayout::from_config(&SessionConfig::default());
        assert_eq!(layout.max_bodies, 32);
        assert_eq!(layout.max_path_vertices, 360);
    }

    #[test]
    fn records_are_camera_relative() {
        let mut body = Body::new(BodyId(0), BodyDesc::new("rock", BodyCategory::Planet, 1000.0));
        body.position = DVec3::new(5.0, 0.0, 0.0);
        body.label.visible = true;
        body.label.order = 2;
        let camera = Camera3D::new(DVec3::new(4.0, 0.0, 1.0), 45.0);

        let mut buffer = SceneBuffer::new(SceneLayout::new(4, 8));
        buffer.write(header(), &Settings::default(), &camera, std::slice::from_ref(&body));

        assert_eq!(buffer.body_count(), 1);
        let record = buffer.bodies()[0];
        assert_eq!(record.offset, [1.0, 0.0, -1.0]);
        assert_eq!(record.label_visible, 1.0);
        assert_eq!(record.label_order, 2.0);
        assert_eq!(record.path_vertex_count, 0.0);

        let h = &buffer.as_slice()[..HEADER_FLOATS];
        assert_eq!(h[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(h[HEADER_FRAME_COUNTER], 7.0);
        assert_eq!(h[HEADER_BODY_COUNT], 1.0);
        assert_eq!(h[HEADER_MODE], 1.0);
        assert_eq!(h[HEADER_DAY_WHOLE], 2451545.0);
        assert_eq!(h[HEADER_DAY_FRACTION], 0.25);
        assert_eq!(
            h[HEADER_FLAGS] as u32,
            FLAG_LABELS | FLAG_ORBITS | FLAG_STARS
        );
    }

    #[test]
    fn paths_are_clipped_to_capacity() {
        let mut body = Body::new(
            BodyId(0),
            BodyDesc::new("mars", BodyCategory::Planet, 3389.5).with_ephemeris("mars"),
        );
        let mut path = OrbitPath::new(687.0, 16);
        path.resample(2451545.0, "mars", &KeplerEphemeris, 1.0);
        body.orbit = Some(path);
        let camera = Camera3D::new(DVec3::ZERO, 45.0);

        let mut buffer = SceneBuffer::new(SceneLayout::new(2, 4));
        buffer.write(header(), &Settings::default(), &camera, std::slice::from_ref(&body));
        assert_eq!(buffer.bodies()[0].path_vertex_count, 4.0);
        let first = body.orbit.as_ref().unwrap().vertices()[0].as_vec3().to_array();
        let at = buffer.layout().path_offset(0);
        assert_eq!(&buffer.as_slice()[at..at + 3], &first);
    }

    #[test]
    fn overflowing_bodies_are_dropped() {
        let bodies: Vec<Body> = (0..3)
            .map(|i| Body::new(BodyId(i), BodyDesc::new(format!("b{i}"), BodyCategory::Moon, 10.0)))
            .collect();
        let mut buffer = SceneBuffer::new(SceneLayout::new(2, 1));
        buffer.write(header(), &Settings::default(), &Camera3D::new(DVec3::ZERO, 45.0), &bodies);
        assert_eq!(buffer.body_count(), 2);
        assert_eq!(buffer.as_slice()[HEADER_BODY_COUNT], 2.0);
    }

    #[test]
    fn record_size_matches_wire_format() {
        assert_eq!(std::mem::size_of::<BodyRecord>(), BODY_FLOATS * 4);
        assert_eq!(std::mem::size_of::<CameraRecord>(), CAMERA_FLOATS * 4);
    }
}
