//! Provides the fundamental operations an autoencoder [Layer][1] is built from.
//! [1]: ../layer/index.html
//!
//! The operations can be roughly grouped into four categories:
//!
//! * [__Activation__][mod_activation]</br>
//! Activations provide element-wise (softmax: row-wise) operations and produce an
//! output of the same size as their input.
//! It can be seen as a synonym to nonlinear [Activation Functions][2].
//!
//! * [__Common__][mod_common]</br>
//! Common operations are the building blocks that are neither activations nor losses.
//! For an autoencoder this is the linear projection shared by encoder and decoder.
//!
//! * [__Loss__][mod_loss]</br>
//! Losses compare a reconstruction to its target and assign a cost to minimize.
//!
//! * [__Utility__][mod_utility]</br>
//! Utility operations prepare the data flowing into a layer, e.g. the input
//! corruption of a denoising autoencoder.
//!
//! [2]: https://en.wikipedia.org/wiki/Activation_function
//!
//! [mod_activation]: ./activation/index.html
//! [mod_common]: ./common/index.html
//! [mod_loss]: ./loss/index.html
//! [mod_utility]: ./utility/index.html

#[allow(unused_import_braces)]
pub use self::activation::{
    Activation, ActivationFn,
    ReLU,
    Sigmoid,
    Softmax,
    TanH,
};

#[allow(unused_import_braces)]
pub use self::common::{
    Linear,
};

#[allow(unused_import_braces)]
pub use self::loss::{
    CrossEntropy,
    LossFn, LossKind,
    RootMeanSquaredError,
};

#[allow(unused_import_braces)]
pub use self::utility::{
    NoiseSpec,
};

pub mod activation;
pub mod common;
pub mod loss;
pub mod utility;
