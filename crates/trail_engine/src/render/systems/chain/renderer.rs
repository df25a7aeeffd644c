//! Billboard chain object and per-frame rebuild pipeline
//!
//! [`BillboardChain`] owns the element store, the dirty-state record, and
//! the CPU-side vertex/index arrays. Each `render()` call re-evaluates the
//! dirty flags in a fixed order (vertex layout, buffer allocation, vertex
//! content, index content), then brackets a single indexed draw with the
//! chain's render-state block.

use super::dirty::DirtyFlags;
use super::geometry::{camera_facing_lateral, chain_tangent, oriented_lateral};
use super::store::ChainStore;
use super::types::{
    validate_capacity, ChainConfig, ChainElement, ChainVertex, TexCoordDirection, VertexLayout,
};
use super::ChainError;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::api::{
    BufferHandle, BufferKind, BufferUsage, ChainFrameData, MeshDraw, ProgramHandle, RenderBackend,
    TextureHandle, UniformLocation,
};
use crate::render::primitives::AABB;
use crate::render::state::{BlendFunc, StateBlock};
use crate::render::{RenderError, RenderResult};

/// GPU buffer pair backing one chain object
#[derive(Debug, Clone, Copy)]
struct ChainBuffers {
    vertex: BufferHandle,
    index: BufferHandle,
}

/// Uniform locations resolved once per attached program
#[derive(Debug, Clone, Copy)]
struct UniformSlots {
    color: Option<UniformLocation>,
    texture: Option<UniformLocation>,
    pmatrix: Option<UniformLocation>,
}

impl UniformSlots {
    fn resolve(backend: &dyn RenderBackend, program: ProgramHandle) -> Self {
        Self {
            color: backend.uniform_location(program, "u_color"),
            texture: backend.uniform_location(program, "u_texture"),
            pmatrix: backend.uniform_location(program, "u_PMatrix"),
        }
    }
}

/// A set of billboard chains sharing one element pool and one draw call
///
/// Chains are index-addressed; every chain has the same element capacity.
/// Mutations only raise dirty flags; all GPU work is deferred to the next
/// [`BillboardChain::render`] invocation, which must run on the thread that
/// owns the GPU context.
#[derive(Debug)]
pub struct BillboardChain {
    name: String,
    tex_file: String,
    store: ChainStore,
    use_texture_coords: bool,
    use_vertex_colours: bool,
    dynamic: bool,
    tex_coord_direction: TexCoordDirection,
    other_tex_coord_range: [f32; 2],
    face_camera: bool,
    normal_base: Vec3,

    dirty: DirtyFlags,
    layout: VertexLayout,
    vertices: Vec<ChainVertex>,
    indices: Vec<u16>,
    buffers: Option<ChainBuffers>,
    texture: Option<TextureHandle>,
    program: Option<ProgramHandle>,
    uniform_slots: Option<UniformSlots>,
    state_block: StateBlock,
    saved_state: Option<StateBlock>,
    bounds: Option<AABB>,
    last_eye_position: Option<Vec3>,
}

impl BillboardChain {
    /// Create a chain set from a validated configuration
    pub fn new(config: ChainConfig) -> Result<Self, ChainError> {
        config.validate()?;
        log::debug!(
            "creating billboard chain '{}': {} chains x {} elements",
            config.name,
            config.number_of_chains,
            config.max_elements
        );
        Ok(Self {
            store: ChainStore::new(config.max_elements, config.number_of_chains),
            layout: VertexLayout::for_chain(config.use_texture_coords, config.use_vertex_colours),
            name: config.name,
            tex_file: config.tex_file,
            use_texture_coords: config.use_texture_coords,
            use_vertex_colours: config.use_vertex_colours,
            dynamic: config.dynamic,
            tex_coord_direction: TexCoordDirection::U,
            other_tex_coord_range: [0.0, 1.0],
            face_camera: true,
            normal_base: Vec3::x(),
            dirty: DirtyFlags::all(),
            vertices: Vec::new(),
            indices: Vec::new(),
            buffers: None,
            texture: None,
            program: None,
            uniform_slots: None,
            state_block: StateBlock::default(),
            saved_state: None,
            bounds: None,
            last_eye_position: None,
        })
    }

    /// Identifier given at construction
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Texture asset path from the configuration; empty means untextured
    pub fn tex_file(&self) -> &str {
        &self.tex_file
    }

    /// Maximum number of elements per chain
    pub fn max_chain_elements(&self) -> usize {
        self.store.max_elements()
    }

    /// Change the per-chain element capacity
    ///
    /// Discards every stored element and forces full buffer recreation.
    pub fn set_max_chain_elements(&mut self, max_elements: usize) -> Result<(), ChainError> {
        validate_capacity(max_elements, self.store.chain_count())?;
        self.store.reset(max_elements, self.store.chain_count());
        self.dirty = DirtyFlags::all();
        log::debug!(
            "chain '{}' resized to {} elements per chain, elements discarded",
            self.name,
            max_elements
        );
        Ok(())
    }

    /// Number of separate chains in this object
    pub fn number_of_chains(&self) -> usize {
        self.store.chain_count()
    }

    /// Change the number of chains
    ///
    /// Discards every stored element and forces full buffer recreation.
    pub fn set_number_of_chains(&mut self, number_of_chains: usize) -> Result<(), ChainError> {
        validate_capacity(self.store.max_elements(), number_of_chains)?;
        self.store.reset(self.store.max_elements(), number_of_chains);
        self.dirty = DirtyFlags::all();
        log::debug!(
            "chain '{}' resized to {} chains, elements discarded",
            self.name,
            number_of_chains
        );
        Ok(())
    }

    /// Whether texture coordinates are written into the vertex declaration
    pub fn use_texture_coords(&self) -> bool {
        self.use_texture_coords
    }

    /// Toggle texture-coordinate output
    ///
    /// Rejected with [`ChainError::ConfigurationConflict`] if it would leave
    /// the vertices with neither texture coordinates nor colours.
    pub fn set_use_texture_coords(&mut self, use_texture_coords: bool) -> Result<(), ChainError> {
        if !use_texture_coords && !self.use_vertex_colours {
            return Err(ChainError::ConfigurationConflict);
        }
        self.use_texture_coords = use_texture_coords;
        self.dirty |= DirtyFlags::VERTEX_DECL | DirtyFlags::VERTEX_CONTENT;
        Ok(())
    }

    /// Whether vertex colours are written into the vertex declaration
    pub fn use_vertex_colours(&self) -> bool {
        self.use_vertex_colours
    }

    /// Toggle vertex-colour output, with the same conflict rule as
    /// [`Self::set_use_texture_coords`]
    pub fn set_use_vertex_colours(&mut self, use_vertex_colours: bool) -> Result<(), ChainError> {
        if !use_vertex_colours && !self.use_texture_coords {
            return Err(ChainError::ConfigurationConflict);
        }
        self.use_vertex_colours = use_vertex_colours;
        self.dirty |= DirtyFlags::VERTEX_DECL | DirtyFlags::VERTEX_CONTENT;
        Ok(())
    }

    /// Axis the per-element texture coordinate runs along
    pub fn texture_coord_direction(&self) -> TexCoordDirection {
        self.tex_coord_direction
    }

    /// Set which axis the per-element texture coordinate runs along
    pub fn set_texture_coord_direction(&mut self, direction: TexCoordDirection) {
        self.tex_coord_direction = direction;
        self.dirty |= DirtyFlags::VERTEX_CONTENT;
    }

    /// Texture-coordinate range generated across the ribbon's width
    pub fn other_texture_coord_range(&self) -> [f32; 2] {
        self.other_tex_coord_range
    }

    /// Set the texture-coordinate range generated across the ribbon's width
    pub fn set_other_texture_coord_range(&mut self, start: f32, end: f32) {
        self.other_tex_coord_range = [start, end];
        self.dirty |= DirtyFlags::VERTEX_CONTENT;
    }

    /// Whether buffers are created for frequent updates
    pub fn dynamic(&self) -> bool {
        self.dynamic
    }

    /// Change the buffer update-frequency hint, forcing buffer recreation
    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
        self.dirty |= DirtyFlags::BUFFERS;
    }

    /// Whether billboards face the camera
    pub fn face_camera(&self) -> bool {
        self.face_camera
    }

    /// Choose between camera-facing and fixed-orientation billboards
    ///
    /// Camera-facing chains emulate a tube and suit smoke trails and light
    /// beams; fixed-orientation chains give a planar ribbon whose twist the
    /// caller controls through each element's orientation relative to
    /// `normal_vector`. The vector must be non-zero; it is normalized here.
    pub fn set_face_camera(&mut self, face_camera: bool, normal_vector: Vec3) {
        self.face_camera = face_camera;
        let norm = normal_vector.norm();
        if norm > f32::EPSILON {
            self.normal_base = normal_vector / norm;
        } else {
            log::warn!(
                "chain '{}': ignoring zero-length normal vector for set_face_camera",
                self.name
            );
        }
        self.dirty |= DirtyFlags::VERTEX_CONTENT;
    }

    /// Enable or disable depth testing for the chain's draw
    pub fn set_depth_test(&mut self, depth_test: bool) {
        self.state_block.depth_test = depth_test;
    }

    /// Enable or disable depth writes for the chain's draw
    pub fn set_depth_write(&mut self, depth_write: bool) {
        self.state_block.depth_write = depth_write;
    }

    /// Set the blend function used for the chain's draw
    pub fn set_blend_func(&mut self, blend: BlendFunc) {
        self.state_block.blend = blend;
    }

    /// Attach the texture the host resolved for [`Self::tex_file`]
    pub fn set_texture(&mut self, texture: TextureHandle) {
        self.texture = Some(texture);
    }

    /// Attach the shader program state created by the host
    ///
    /// Uniform locations (`u_color`, `u_texture`, `u_PMatrix`) are resolved
    /// lazily on the next render. Without a program the chain still keeps
    /// its buffers current but skips draw submission.
    pub fn set_program(&mut self, program: ProgramHandle) {
        self.program = Some(program);
        self.uniform_slots = None;
    }

    /// Append an element at the head of a chain, evicting the tail if full
    pub fn add_chain_element(
        &mut self,
        chain_index: usize,
        element: ChainElement,
    ) -> Result<(), ChainError> {
        self.store.add(chain_index, element)?;
        self.dirty |= DirtyFlags::TOPOLOGY_CHANGE;
        Ok(())
    }

    /// Remove the oldest element of a chain; a no-op when already empty
    pub fn remove_chain_element(&mut self, chain_index: usize) -> Result<(), ChainError> {
        self.store.remove(chain_index)?;
        self.dirty |= DirtyFlags::TOPOLOGY_CHANGE;
        Ok(())
    }

    /// Overwrite an element, addressed from the head (0 = newest)
    pub fn update_chain_element(
        &mut self,
        chain_index: usize,
        element_index: usize,
        element: ChainElement,
    ) -> Result<(), ChainError> {
        self.store.update(chain_index, element_index, element)?;
        self.dirty |= DirtyFlags::ELEMENT_MUTATION;
        Ok(())
    }

    /// Read an element, addressed from the head (0 = newest)
    pub fn get_chain_element(
        &self,
        chain_index: usize,
        element_index: usize,
    ) -> Result<&ChainElement, ChainError> {
        self.store.get(chain_index, element_index)
    }

    /// Number of live elements in a chain
    pub fn num_chain_elements(&self, chain_index: usize) -> Result<usize, ChainError> {
        self.store.count(chain_index)
    }

    /// Remove every element of one chain, leaving the chain itself intact
    pub fn clear_chain(&mut self, chain_index: usize) -> Result<(), ChainError> {
        self.store.clear(chain_index)?;
        self.dirty |= DirtyFlags::TOPOLOGY_CHANGE;
        Ok(())
    }

    /// Remove every element from every chain
    pub fn clear_all_chains(&mut self) {
        self.store.clear_all();
        self.dirty |= DirtyFlags::TOPOLOGY_CHANGE;
    }

    /// Current vertex declaration, rebuilt first if a toggle left it stale
    pub fn vertex_layout(&mut self) -> &VertexLayout {
        if self.dirty.contains(DirtyFlags::VERTEX_DECL) {
            self.layout = VertexLayout::for_chain(self.use_texture_coords, self.use_vertex_colours);
            self.dirty.remove(DirtyFlags::VERTEX_DECL);
        }
        &self.layout
    }

    /// World-space bounds of all live elements, recomputed only when stale
    ///
    /// Returns `None` while every chain is empty.
    pub fn bounding_box(&mut self) -> Option<AABB> {
        if self.dirty.contains(DirtyFlags::BOUNDS) {
            self.bounds = self.compute_bounds();
            self.dirty.remove(DirtyFlags::BOUNDS);
        }
        self.bounds
    }

    /// Release the GPU buffer pair owned by this chain
    ///
    /// Call before dropping the chain so the backend can reclaim the
    /// buffers; a later render reallocates from scratch.
    pub fn destroy_buffers(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(buffers) = self.buffers.take() {
            backend.destroy_buffer(buffers.vertex);
            backend.destroy_buffer(buffers.index);
        }
        self.dirty |= DirtyFlags::BUFFERS;
    }

    /// Regenerate stale derived state and submit one draw
    ///
    /// Order matters: vertex layout, then buffer allocation, then vertex
    /// and index content, then the state-bracketed draw. All pending element
    /// mutations for the frame must be complete before this is called.
    pub fn render(
        &mut self,
        backend: &mut dyn RenderBackend,
        transform: &Mat4,
        frame: &ChainFrameData<'_>,
    ) -> RenderResult<()> {
        let eye_position = frame.camera.position;

        // Camera-facing geometry depends on the view point, so a camera move
        // is a content change even without element mutations.
        if self.face_camera && self.last_eye_position != Some(eye_position) {
            self.dirty |= DirtyFlags::VERTEX_CONTENT;
        }

        if self.dirty.contains(DirtyFlags::VERTEX_DECL) {
            self.layout = VertexLayout::for_chain(self.use_texture_coords, self.use_vertex_colours);
            self.dirty.remove(DirtyFlags::VERTEX_DECL);
        }

        if self.dirty.contains(DirtyFlags::BUFFERS) {
            self.setup_buffers(backend)?;
        }
        let buffers = self
            .buffers
            .ok_or_else(|| RenderError::BackendError("chain buffers not allocated".to_string()))?;

        if self.dirty.contains(DirtyFlags::VERTEX_CONTENT) {
            self.update_vertex_content(eye_position);
            backend.update_buffer(buffers.vertex, bytemuck::cast_slice(&self.vertices))?;
            self.dirty.remove(DirtyFlags::VERTEX_CONTENT);
            self.last_eye_position = Some(eye_position);
        }

        if self.dirty.contains(DirtyFlags::INDEX_CONTENT) {
            self.update_index_content();
            backend.update_buffer(buffers.index, bytemuck::cast_slice(&self.indices))?;
            self.dirty.remove(DirtyFlags::INDEX_CONTENT);
        }

        if self.indices.is_empty() {
            return Ok(());
        }

        let Some(program) = self.program else {
            log::trace!("chain '{}' has no program attached, skipping draw", self.name);
            return Ok(());
        };
        if self.uniform_slots.is_none() {
            self.uniform_slots = Some(UniformSlots::resolve(&*backend, program));
        }
        if let Some(slots) = self.uniform_slots {
            if let Some(location) = slots.pmatrix {
                let pmatrix = frame.camera.view_projection() * *transform;
                backend.set_uniform_mat4(program, location, &pmatrix);
            }
            if let Some(location) = slots.color {
                backend.set_uniform_vec4(program, location, [1.0, 1.0, 1.0, frame.opacity]);
            }
            if let (Some(location), Some(texture)) = (slots.texture, self.texture) {
                backend.bind_texture(program, location, texture);
            }
        }

        self.on_before_draw(backend);
        let draw = backend.draw_indexed(&MeshDraw {
            vertex_buffer: buffers.vertex,
            index_buffer: buffers.index,
            index_count: self.indices.len(),
            program,
        });
        self.on_after_draw(backend);
        draw
    }

    /// Destroy and recreate the GPU buffer pair at the current capacity
    ///
    /// Content flags are raised afterwards so fresh buffers always get
    /// rewritten before the next draw.
    fn setup_buffers(&mut self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        if let Some(buffers) = self.buffers.take() {
            backend.destroy_buffer(buffers.vertex);
            backend.destroy_buffer(buffers.index);
        }

        let max_elements = self.store.max_elements();
        let chain_count = self.store.chain_count();
        let vertex_count = max_elements * chain_count * 2;
        let max_index_count = chain_count * max_elements.saturating_sub(1) * 6;

        self.vertices.clear();
        self.vertices.resize(vertex_count, ChainVertex::default());
        self.indices.clear();
        self.indices.reserve(max_index_count);

        let usage = if self.dynamic {
            BufferUsage::Dynamic
        } else {
            BufferUsage::Static
        };
        let vertex = backend.create_buffer(
            BufferKind::Vertex,
            usage,
            vertex_count * std::mem::size_of::<ChainVertex>(),
        )?;
        let index = backend.create_buffer(
            BufferKind::Index,
            usage,
            max_index_count * std::mem::size_of::<u16>(),
        )?;
        self.buffers = Some(ChainBuffers { vertex, index });

        log::debug!(
            "chain '{}': allocated buffers for {} vertices / {} indices",
            self.name,
            vertex_count,
            max_index_count
        );

        self.dirty.remove(DirtyFlags::BUFFERS);
        self.dirty |= DirtyFlags::VERTEX_CONTENT | DirtyFlags::INDEX_CONTENT;
        Ok(())
    }

    /// Rewrite the CPU vertex array from the live elements
    ///
    /// Vertices land at their ring position (`(start + slot) * 2`) so the
    /// index generator can address them without compaction. Chains with
    /// fewer than two elements produce no quads and are skipped.
    fn update_vertex_content(&mut self, eye_position: Vec3) {
        let store = &self.store;
        let vertices = &mut self.vertices;
        let max = store.max_elements();

        for seg in store.segments() {
            if seg.is_empty() || seg.head == seg.tail {
                continue;
            }

            let mut e = seg.tail;
            loop {
                let elem = store.slot(seg.start + e);
                let first = e == seg.tail;
                let last = e == seg.head;

                let prev = (!first).then(|| {
                    store
                        .slot(seg.start + (e + max - 1) % max)
                        .position
                });
                let next = (!last).then(|| store.slot(seg.start + (e + 1) % max).position);
                let tangent = chain_tangent(prev, elem.position, next);

                let lateral = if self.face_camera {
                    camera_facing_lateral(eye_position, elem.position, tangent)
                } else {
                    oriented_lateral(self.normal_base, &elem.orientation)
                };
                let offset = lateral * (elem.width * 0.5);

                let [other_start, other_end] = self.other_tex_coord_range;
                let (uv0, uv1) = match self.tex_coord_direction {
                    TexCoordDirection::U => (
                        [elem.tex_coord, other_start],
                        [elem.tex_coord, other_end],
                    ),
                    TexCoordDirection::V => (
                        [other_start, elem.tex_coord],
                        [other_end, elem.tex_coord],
                    ),
                };
                let color: [f32; 4] = elem.color.into();

                let base = (seg.start + e) * 2;
                vertices[base] = ChainVertex {
                    position: (elem.position - offset).into(),
                    uv: uv0,
                    color,
                };
                vertices[base + 1] = ChainVertex {
                    position: (elem.position + offset).into(),
                    uv: uv1,
                    color,
                };

                if last {
                    break;
                }
                e = (e + 1) % max;
            }
        }
    }

    /// Rewrite the CPU index array from the live topology
    ///
    /// Two counter-clockwise triangles per consecutive element pair; chains
    /// never share indices.
    fn update_index_content(&mut self) {
        let max = self.store.max_elements();
        self.indices.clear();

        for seg in self.store.segments() {
            if seg.is_empty() || seg.head == seg.tail {
                continue;
            }

            let mut e = seg.tail;
            while e != seg.head {
                let next = (e + 1) % max;
                let base = ((seg.start + e) * 2) as u16;
                let next_base = ((seg.start + next) * 2) as u16;
                self.indices.extend_from_slice(&[
                    next_base,
                    next_base + 1,
                    base,
                    next_base + 1,
                    base + 1,
                    base,
                ]);
                e = next;
            }
        }
    }

    fn compute_bounds(&self) -> Option<AABB> {
        let max = self.store.max_elements();
        let mut bounds: Option<AABB> = None;

        for seg in self.store.segments() {
            if seg.is_empty() {
                continue;
            }
            let mut e = seg.tail;
            loop {
                let elem = self.store.slot(seg.start + e);
                let half = Vec3::repeat(elem.width * 0.5);
                let (low, high) = (elem.position - half, elem.position + half);
                match &mut bounds {
                    Some(bb) => {
                        bb.merge_point(low);
                        bb.merge_point(high);
                    }
                    None => {
                        let mut bb = AABB::from_point(low);
                        bb.merge_point(high);
                        bounds = Some(bb);
                    }
                }
                if e == seg.head {
                    break;
                }
                e = (e + 1) % max;
            }
        }
        bounds
    }

    /// Apply the chain's render state, remembering what it displaced
    fn on_before_draw(&mut self, backend: &mut dyn RenderBackend) {
        self.saved_state = Some(backend.apply_state(&self.state_block));
    }

    /// Restore the render state captured by [`Self::on_before_draw`]
    fn on_after_draw(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(previous) = self.saved_state.take() {
            backend.apply_state(&previous);
        }
    }
}
