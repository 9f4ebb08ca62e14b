pub mod interpreter;
pub mod sampling;
pub mod scenario;
pub mod transport;
pub mod zmq;
