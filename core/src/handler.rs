//! Binding extracted values to handler parameters.
//!
//! Any `FnMut` closure or function taking up to twelve [`Param`] arguments
//! is a [`Handler`]. Values are bound positionally and checked for arity and
//! type compatibility before the handler runs; on a binding error the
//! handler is never called.
//!
//! A trailing [`Rest<T>`] parameter accepts every remaining value, which
//! makes the handler variadic. `Rest<Value>` receives values untyped.
//!
//! # Examples
//!
//! ```
//! use command_match_core::{Handler, Rest, Value};
//!
//! let mut total: i64 = 0;
//! let mut sum = |label: String, nums: Rest<i64>| {
//!     assert_eq!(label, "sum");
//!     total = nums.iter().sum();
//! };
//! sum.invoke(vec![Value::from("sum"), Value::Int(2), Value::Int(3)]).unwrap();
//! assert_eq!(total, 5);
//! ```

use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::error::BindError;
use crate::Value;

/// Conversion from an extracted [`Value`] to a concrete parameter type.
///
/// Numeric values convert between integer and float types; strings and
/// booleans only convert to themselves.
pub trait FromValue: Sized {
    /// Type name used in binding errors.
    const TYPE_NAME: &'static str;

    /// Returns `None` when the value is not compatible.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl FromValue for String {
    const TYPE_NAME: &'static str = "String";

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_value(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl FromValue for f64 {
    const TYPE_NAME: &'static str = "f64";

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64()
    }
}

impl FromValue for f32 {
    const TYPE_NAME: &'static str = "f32";

    fn from_value(value: Value) -> Option<Self> {
        value.as_f64().map(|f| f as f32)
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_value(value: Value) -> Option<Self> {
                    value.as_i64().and_then(|i| <$ty>::try_from(i).ok())
                }
            }
        )*
    };
}

integer_from_value!(i64, i32, i16, i8, isize, u64, u32, u16, u8, usize);

/// Variadic tail of a handler's parameter list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rest<T>(pub Vec<T>);

impl<T> Rest<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for Rest<T> {
    type Target = Vec<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Rest<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Values being bound, consumed from the front.
#[derive(Debug)]
pub struct Bindings {
    values: std::vec::IntoIter<Value>,
    index: usize,
}

impl Bindings {
    fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
            index: 0,
        }
    }

    /// Binds the next value.
    ///
    /// # Errors
    ///
    /// Fails when no value is left or the value is incompatible with `T`.
    pub fn next<T: FromValue>(&mut self) -> Result<T, BindError> {
        let index = self.index;
        let value = self.values.next().ok_or(BindError::Arity {
            expected: index + 1,
            variadic: false,
            found: index,
        })?;
        self.index += 1;

        let found = value.kind();
        T::from_value(value).ok_or(BindError::Incompatible {
            index,
            expected: T::TYPE_NAME,
            found,
        })
    }

    /// Binds every remaining value.
    ///
    /// # Errors
    ///
    /// Fails on the first value incompatible with `T`.
    pub fn rest<T: FromValue>(&mut self) -> Result<Vec<T>, BindError> {
        let mut out = Vec::with_capacity(self.values.len());
        while self.values.len() > 0 {
            out.push(self.next()?);
        }
        Ok(out)
    }
}

/// A handler parameter.
pub trait Param: Sized {
    /// `true` when the parameter absorbs every remaining value.
    const REST: bool = false;

    /// Takes this parameter's value(s) from `bindings`.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] when the values do not fit.
    fn bind(bindings: &mut Bindings) -> Result<Self, BindError>;
}

macro_rules! scalar_param {
    ($($ty:ty),*) => {
        $(
            impl Param for $ty {
                fn bind(bindings: &mut Bindings) -> Result<Self, BindError> {
                    bindings.next()
                }
            }
        )*
    };
}

scalar_param!(Value, String, bool, f64, f32, i64, i32, i16, i8, isize, u64, u32, u16, u8, usize);

impl<T: FromValue> Param for Rest<T> {
    const REST: bool = true;

    fn bind(bindings: &mut Bindings) -> Result<Self, BindError> {
        bindings.rest().map(Rest)
    }
}

/// Checks a value count against a parameter list described by its `REST`
/// markers.
fn check_arity(rest: &[bool], found: usize) -> Result<(), BindError> {
    let Some((&last, fixed)) = rest.split_last() else {
        return if found == 0 {
            Ok(())
        } else {
            Err(BindError::Arity {
                expected: 0,
                variadic: false,
                found,
            })
        };
    };
    if fixed.iter().any(|&r| r) {
        return Err(BindError::RestNotLast);
    }

    let expected = if last { fixed.len() } else { rest.len() };
    let fits = if last { found >= expected } else { found == expected };
    if fits {
        Ok(())
    } else {
        Err(BindError::Arity {
            expected,
            variadic: last,
            found,
        })
    }
}

/// A callable that accepts extracted values.
///
/// `Marker` only disambiguates the blanket implementations for different
/// arities and is inferred from the closure's parameter types.
pub trait Handler<Marker> {
    /// Binds `values` to the parameters and calls the handler once.
    ///
    /// # Errors
    ///
    /// Returns a [`BindError`] without calling the handler when the values
    /// do not fit the signature.
    fn invoke(&mut self, values: Vec<Value>) -> Result<(), BindError>;
}

macro_rules! impl_handler {
    ($($P:ident $p:ident),*) => {
        impl<F, $($P),*> Handler<fn($($P),*)> for F
        where
            F: FnMut($($P),*),
            $($P: Param,)*
        {
            #[allow(unused_mut, unused_variables)]
            fn invoke(&mut self, values: Vec<Value>) -> Result<(), BindError> {
                let rest: &[bool] = &[$($P::REST),*];
                check_arity(rest, values.len())?;
                let mut bindings = Bindings::new(values);
                $(let $p = $P::bind(&mut bindings)?;)*
                (*self)($($p),*);
                Ok(())
            }
        }
    };
}

impl_handler!();
impl_handler!(P1 p1);
impl_handler!(P1 p1, P2 p2);
impl_handler!(P1 p1, P2 p2, P3 p3);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9, P10 p10);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9, P10 p10, P11 p11);
impl_handler!(P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7, P8 p8, P9 p9, P10 p10, P11 p11, P12 p12);

/// Object-safe form of [`Handler`], stored by groups.
pub(crate) trait ErasedHandler {
    fn invoke(&mut self, values: Vec<Value>) -> Result<(), BindError>;
}

pub(crate) struct Erased<H, M> {
    handler: H,
    _marker: PhantomData<fn() -> M>,
}

impl<H, M> Erased<H, M> {
    pub(crate) fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

impl<H: Handler<M>, M> ErasedHandler for Erased<H, M> {
    fn invoke(&mut self, values: Vec<Value>) -> Result<(), BindError> {
        self.handler.invoke(values)
    }
}
