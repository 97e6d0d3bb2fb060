//! Blob-store suffix: variable-length tails behind a record store
//! blob 存储后缀：记录存储背后的变长尾部

use zidx_blob::SortedStore;

#[derive(Debug)]
pub struct BlobStoreSuffix<'a> {
  pub(crate) store: SortedStore<'a>,
}

impl<'a> BlobStoreSuffix<'a> {
  pub fn new(store: SortedStore<'a>) -> Self {
    Self { store }
  }

  #[inline]
  pub fn key_count(&self) -> usize {
    self.store.len()
  }

  #[inline]
  pub fn total_key_size(&self) -> usize {
    self.store.total_data_size()
  }

  pub fn lower_bound<'b>(
    &'b self,
    target: &[u8],
    lo: usize,
    count: usize,
    buf: &'b mut Vec<u8>,
  ) -> (usize, &'b [u8]) {
    let end = lo + count;
    let sid = self.store.lower_bound(lo, end, target);
    if sid == end {
      return (sid, &[]);
    }
    buf.clear();
    self.store.get_record_append(sid, buf);
    (sid, buf.as_slice())
  }
}
