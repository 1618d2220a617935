use bevy::prelude::*;
use crate::core::class_kind::ClassKind;

/// Transforms (and, for ornaments, colors) for one instance class.
#[derive(Debug, Clone, Default)]
pub struct ClassBuffer {
    transforms: Vec<Transform>,
    colors: Vec<LinearRgba>,
    transforms_dirty: bool,
    colors_dirty: bool,
}

impl ClassBuffer {
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn colors(&self) -> &[LinearRgba] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms_dirty(&self) -> bool {
        self.transforms_dirty
    }

    pub fn colors_dirty(&self) -> bool {
        self.colors_dirty
    }

    pub fn resize(&mut self, len: usize) {
        self.transforms.resize(len, Transform::IDENTITY);
        self.colors.truncate(len);
        self.transforms_dirty = true;
        self.colors_dirty = true;
    }

    pub fn set_colors(&mut self, colors: Vec<LinearRgba>) {
        self.colors = colors;
        self.colors_dirty = true;
    }

    /// Writes a transform unless it carries NaN or infinity, in which case the
    /// previous value stays. Returns whether the slot changed.
    pub fn write_transform(&mut self, index: usize, transform: Transform) -> bool {
        let Some(slot) = self.transforms.get_mut(index) else {
            return false;
        };
        if !is_finite_transform(&transform) || *slot == transform {
            return false;
        }
        *slot = transform;
        self.transforms_dirty = true;
        true
    }

    pub fn color(&self, index: usize) -> Option<LinearRgba> {
        self.colors.get(index).copied()
    }

    pub fn write_color(&mut self, index: usize, color: LinearRgba) {
        if let Some(slot) = self.colors.get_mut(index) {
            if *slot != color {
                *slot = color;
                self.colors_dirty = true;
            }
        }
    }

    fn clear_dirty(&mut self) {
        self.transforms_dirty = false;
        self.colors_dirty = false;
    }
}

fn is_finite_transform(transform: &Transform) -> bool {
    transform.translation.is_finite()
        && transform.rotation.is_finite()
        && transform.scale.is_finite()
}

/// Consumer of the per-frame instance data, typically a renderer upload.
pub trait InstanceSink {
    fn upload(&mut self, class: ClassKind, buffer: &ClassBuffer);
}

/// Output table the renderer reads once per frame.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    classes: [ClassBuffer; 3],
}

impl InstanceBuffer {
    pub fn class(&self, class: ClassKind) -> &ClassBuffer {
        &self.classes[class.index()]
    }

    pub fn class_mut(&mut self, class: ClassKind) -> &mut ClassBuffer {
        &mut self.classes[class.index()]
    }

    pub fn is_dirty(&self) -> bool {
        self.classes.iter().any(|c| c.transforms_dirty || c.colors_dirty)
    }

    /// Hands every dirty class to the sink, then clears the dirty flags.
    pub fn flush(&mut self, sink: &mut impl InstanceSink) {
        for class in ClassKind::ALL {
            let buffer = &mut self.classes[class.index()];
            if buffer.transforms_dirty || buffer.colors_dirty {
                sink.upload(class, buffer);
                buffer.clear_dirty();
            }
        }
    }
}
