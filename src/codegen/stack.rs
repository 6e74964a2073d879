//! Composable stack manipulations and their operand stack accounting.
//!
//! A [`StackManipulation`] emits a sequence of instructions into a
//! [`MethodSink`] and reports the resulting [`Size`]: the net change of the
//! operand stack height and the highest height reached while executing the
//! sequence, relative to the height before it. Sizes of consecutive
//! manipulations compose with [`Size::aggregate`], which is what allows a method
//! body to compute its `max_stack` without a data flow analysis.

use std::fmt;
use std::ops::Add;

use super::defs::ClassFileVersion;
use super::sink::MethodSink;

/// Net and peak operand stack impact of an instruction sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    impact: i32,
    maximal: i32,
}

impl Size {
    pub const ZERO: Size = Size { impact: 0, maximal: 0 };

    pub fn new(impact: i32, maximal: i32) -> Self {
        debug_assert!(maximal >= impact.max(0), "peak {} below net impact {}", maximal, impact);
        Self { impact, maximal }
    }

    /// Net change of the stack height
    pub fn size_impact(&self) -> i32 {
        self.impact
    }

    /// Highest stack height reached, relative to the height before the sequence
    pub fn maximal_size(&self) -> i32 {
        self.maximal
    }

    /// Size of executing `self` followed by `next`
    pub fn aggregate(self, next: Size) -> Size {
        Size {
            impact: self.impact + next.impact,
            maximal: self.maximal.max(self.impact + next.maximal),
        }
    }
}

impl Add for Size {
    type Output = Size;

    fn add(self, rhs: Size) -> Size {
        self.aggregate(rhs)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size(impact={}, max={})", self.impact, self.maximal)
    }
}

/// State shared by all manipulations emitted for one generated type
#[derive(Debug, Clone, Default)]
pub struct Context {
    class_file_version: ClassFileVersion,
}

impl Context {
    pub fn new(class_file_version: ClassFileVersion) -> Self {
        Self { class_file_version }
    }

    pub fn class_file_version(&self) -> ClassFileVersion {
        self.class_file_version
    }
}

/// A unit of bytecode emission.
///
/// Callers must check [`is_valid`](StackManipulation::is_valid) before calling
/// [`apply`](StackManipulation::apply); applying an invalid manipulation is a
/// programming error. Applying emits instructions, so a manipulation is applied
/// at most once per emitted method body.
pub trait StackManipulation: fmt::Debug {
    fn is_valid(&self) -> bool;

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size;

    fn boxed(self) -> Box<dyn StackManipulation>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<T: StackManipulation + ?Sized> StackManipulation for Box<T> {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        (**self).apply(sink, context)
    }
}

impl<T: StackManipulation + ?Sized> StackManipulation for &T {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        (**self).apply(sink, context)
    }
}

/// An absent manipulation is illegal
impl<T: StackManipulation> StackManipulation for Option<T> {
    fn is_valid(&self) -> bool {
        self.as_ref().map_or(false, |m| m.is_valid())
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        match self {
            Some(manipulation) => manipulation.apply(sink, context),
            None => Illegal.apply(sink, context),
        }
    }
}

/// A manipulation that cannot be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Illegal;

impl StackManipulation for Illegal {
    fn is_valid(&self) -> bool {
        false
    }

    fn apply(&self, _sink: &mut dyn MethodSink, _context: &Context) -> Size {
        panic!("An illegal stack manipulation must not be applied");
    }
}

/// A manipulation that emits nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trivial;

impl StackManipulation for Trivial {
    fn is_valid(&self) -> bool {
        true
    }

    fn apply(&self, _sink: &mut dyn MethodSink, _context: &Context) -> Size {
        Size::ZERO
    }
}

/// An ordered sequence of manipulations applied one after another
#[derive(Debug, Default)]
pub struct Compound {
    manipulations: Vec<Box<dyn StackManipulation>>,
}

impl Compound {
    pub fn new(manipulations: Vec<Box<dyn StackManipulation>>) -> Self {
        Self { manipulations }
    }

    pub fn of<I>(manipulations: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn StackManipulation>>,
    {
        Self { manipulations: manipulations.into_iter().collect() }
    }

    pub fn push(&mut self, manipulation: Box<dyn StackManipulation>) {
        self.manipulations.push(manipulation);
    }

    pub fn len(&self) -> usize {
        self.manipulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manipulations.is_empty()
    }
}

impl StackManipulation for Compound {
    fn is_valid(&self) -> bool {
        self.manipulations.iter().all(|m| m.is_valid())
    }

    fn apply(&self, sink: &mut dyn MethodSink, context: &Context) -> Size {
        self.manipulations
            .iter()
            .fold(Size::ZERO, |size, m| size.aggregate(m.apply(sink, context)))
    }
}
