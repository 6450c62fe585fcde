pub mod arcs;
pub mod globe;
pub mod sprites;

/// A vertex/instance buffer that regrows as the frame's geometry does.
///
/// Uploads rewrite the buffer in place while the data fits; when it doesn't,
/// the buffer is recreated at the next power of two so steady-state frames
/// never allocate.
pub struct GrowBuffer {
    label: &'static str,
    usage: wgpu::BufferUsages,
    buf: Option<wgpu::Buffer>,
    capacity: u64,
}

impl GrowBuffer {
    pub fn vertex(label: &'static str) -> Self {
        Self {
            label,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            buf: None,
            capacity: 0,
        }
    }

    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if needed == 0 {
            return;
        }

        if self.buf.is_none() || needed > self.capacity {
            let capacity = needed.next_power_of_two();
            self.buf = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: capacity,
                usage: self.usage,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }

        if let Some(buf) = &self.buf {
            queue.write_buffer(buf, 0, bytes);
        }
    }

    pub fn slice(&self) -> Option<wgpu::BufferSlice<'_>> {
        self.buf.as_ref().map(|b| b.slice(..))
    }
}
