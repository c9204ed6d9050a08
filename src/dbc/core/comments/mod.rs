pub(crate) mod cm_sg_;
