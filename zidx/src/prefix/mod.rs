//! Prefix representations: the structured key heads
//! 前缀表示：键的结构化头部
//!
//! A tagged variant per buildable flavor keeps hot paths monomorphized;
//! load-time polymorphism happens once, in [`Prefix::load`], driven by the
//! wire name from the artifact header.
//! 每个可构建变体一个标签分支，热路径全部单态化；加载期多态只发生一次，
//! 在 [`Prefix::load`] 中由工件头的线上名驱动。

pub mod trie;
pub mod uint_asc;
pub mod uint_nd;

use std::io::Write;

pub use trie::TriePrefix;
pub use uint_asc::AscendingUintPrefix;
pub use uint_nd::NonDescendingUintPrefix;

use zerocopy::{
  FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
  little_endian::U64,
};
use zidx_louds::{Cursor, Trie};
use zidx_rs::{AllOne, FewOne, FewZero, Il256, Se512, wire};

use crate::{
  Error, Result,
  registry::PrefixKind,
  suffix::Suffix,
};

/// Wire head shared by every uint prefix flavor.
/// 所有整数前缀变体共享的段头。
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct UintHead {
  key_length: U64,
  min_value: U64,
  max_value: U64,
}

impl UintHead {
  const SIZE: usize = size_of::<Self>();
}

const _: () = assert!(UintHead::SIZE == 24);

/// Per-cursor scratch of a uint prefix: bitmap position plus the head
/// bytes materialized big-endian.
/// 整数前缀的游标级暂存：位图位置加以大端物化的头字节。
#[derive(Debug, Default)]
pub struct UintIter {
  pub(crate) pos: usize,
  pub(crate) buf: [u8; 8],
  pub(crate) len: usize,
}

/// Per-cursor scratch of any prefix flavor.
/// 任意前缀变体的游标级暂存。
pub enum PrefixIter<'t, 'a> {
  Uint(UintIter),
  Trie(Cursor<'t, 'a>),
}

/// Outcome of a uint prefix seek.
/// 整数前缀查找的结果。
#[derive(Debug, Clone, Copy)]
pub(crate) enum UintSeek {
  /// Past the last stored head.
  /// 越过最后一个已存头。
  Fail,
  At {
    /// Base id of the positioned group
    id: usize,
    /// Bitmap position of the group's first key
    pos: usize,
    /// Keys in the group
    count: usize,
    /// The padded target bytes hit a stored head
    exact: bool,
  },
}

pub enum Prefix<'a> {
  AscAllOne(AscendingUintPrefix<AllOne>),
  AscIl256(AscendingUintPrefix<Il256<'a>>),
  AscSe512(AscendingUintPrefix<Se512<'a>>),
  AscFewZero32(AscendingUintPrefix<FewZero<'a, u32>>),
  AscFewZero64(AscendingUintPrefix<FewZero<'a, u64>>),
  AscFewOne32(AscendingUintPrefix<FewOne<'a, u32>>),
  AscFewOne64(AscendingUintPrefix<FewOne<'a, u64>>),
  NdIl256(NonDescendingUintPrefix<Il256<'a>>),
  NdSe512(NonDescendingUintPrefix<Se512<'a>>),
  NdFewOne32(NonDescendingUintPrefix<FewOne<'a, u32>>),
  NdFewOne64(NonDescendingUintPrefix<FewOne<'a, u64>>),
  Trie(TriePrefix<'a>),
}

/// Dispatch over every flavor; the two uint shapes share one method
/// surface, the trie gets its own arm.
/// 对全部变体分派；两种整数形态共享同一方法面，字典树单独一个分支。
macro_rules! for_all {
  ($p:expr, $x:ident => $body:expr) => {
    match $p {
      Prefix::AscAllOne($x) => $body,
      Prefix::AscIl256($x) => $body,
      Prefix::AscSe512($x) => $body,
      Prefix::AscFewZero32($x) => $body,
      Prefix::AscFewZero64($x) => $body,
      Prefix::AscFewOne32($x) => $body,
      Prefix::AscFewOne64($x) => $body,
      Prefix::NdIl256($x) => $body,
      Prefix::NdSe512($x) => $body,
      Prefix::NdFewOne32($x) => $body,
      Prefix::NdFewOne64($x) => $body,
      Prefix::Trie($x) => $body,
    }
  };
}

/// Dispatch over the uint flavors only; the caller pairs this with a
/// [`UintIter`], which a trie prefix never produces.
/// 仅对整数变体分派；调用方将其与 [`UintIter`] 配对，字典树前缀不会
/// 产生这种暂存。
macro_rules! for_uint {
  ($p:expr, $x:ident => $body:expr) => {
    match $p {
      Prefix::AscAllOne($x) => $body,
      Prefix::AscIl256($x) => $body,
      Prefix::AscSe512($x) => $body,
      Prefix::AscFewZero32($x) => $body,
      Prefix::AscFewZero64($x) => $body,
      Prefix::AscFewOne32($x) => $body,
      Prefix::AscFewOne64($x) => $body,
      Prefix::NdIl256($x) => $body,
      Prefix::NdSe512($x) => $body,
      Prefix::NdFewOne32($x) => $body,
      Prefix::NdFewOne64($x) => $body,
      Prefix::Trie(_) => unreachable!("uint cursor on trie prefix"),
    }
  };
}

impl<'a> Prefix<'a> {
  pub fn kind(&self) -> PrefixKind {
    match self {
      Prefix::AscAllOne(_) => PrefixKind::AscAllOne,
      Prefix::AscIl256(_) => PrefixKind::AscIl256,
      Prefix::AscSe512(_) => PrefixKind::AscSe512,
      Prefix::AscFewZero32(_) => PrefixKind::AscFewZero32,
      Prefix::AscFewZero64(_) => PrefixKind::AscFewZero64,
      Prefix::AscFewOne32(_) => PrefixKind::AscFewOne32,
      Prefix::AscFewOne64(_) => PrefixKind::AscFewOne64,
      Prefix::NdIl256(_) => PrefixKind::NdIl256,
      Prefix::NdSe512(_) => PrefixKind::NdSe512,
      Prefix::NdFewOne32(_) => PrefixKind::NdFewOne32,
      Prefix::NdFewOne64(_) => PrefixKind::NdFewOne64,
      Prefix::Trie(_) => PrefixKind::Trie,
    }
  }

  #[inline]
  pub fn key_count(&self) -> usize {
    for_all!(self, p => p.key_count())
  }

  #[inline]
  pub fn total_key_size(&self) -> usize {
    for_all!(self, p => p.total_key_size())
  }

  pub fn find(&self, key: &[u8], suffix: Option<&Suffix>) -> Option<usize> {
    for_all!(self, p => p.find(key, suffix))
  }

  pub fn dict_rank(&self, key: &[u8], suffix: Option<&Suffix>) -> usize {
    for_all!(self, p => p.dict_rank(key, suffix))
  }

  pub fn needs_reorder(&self) -> bool {
    matches!(self, Prefix::Trie(_))
  }

  /// Only meaningful when `needs_reorder()`.
  /// 仅在 `needs_reorder()` 时有意义。
  pub fn order_map(&self, out: &mut Vec<u64>) {
    match self {
      Prefix::Trie(p) => p.order_map(out),
      _ => out.clear(),
    }
  }

  pub fn build_cache(&mut self, ratio: f64) {
    if let Prefix::Trie(p) = self {
      p.build_cache(ratio);
    }
  }

  /// Fresh cursor scratch for this flavor.
  /// 为该变体创建新的游标暂存。
  pub fn new_iter<'t>(&'t self) -> PrefixIter<'t, 'a> {
    match self {
      Prefix::Trie(p) => PrefixIter::Trie(Cursor::new(&p.trie)),
      _ => PrefixIter::Uint(UintIter::default()),
    }
  }

  pub fn iter_seek_to_first(&self, it: &mut PrefixIter<'_, 'a>) -> Option<usize> {
    match it {
      PrefixIter::Uint(u) => Some(for_uint!(self, p => p.iter_seek_to_first(u))),
      PrefixIter::Trie(cur) => {
        let Prefix::Trie(p) = self else { unreachable!() };
        p.iter_seek_to_first(cur)
      }
    }
  }

  pub fn iter_seek_to_last(&self, it: &mut PrefixIter<'_, 'a>) -> Option<usize> {
    match it {
      PrefixIter::Uint(u) => Some(for_uint!(self, p => p.iter_seek_to_last(u))),
      PrefixIter::Trie(cur) => {
        let Prefix::Trie(p) = self else { unreachable!() };
        p.iter_seek_to_last(cur)
      }
    }
  }

  /// Lower-bound seek; returns the candidate group `(id, count)`.
  /// 下界查找；返回候选组 `(id, count)`。
  pub fn iter_seek(&self, it: &mut PrefixIter<'_, 'a>, target: &[u8]) -> Option<(usize, usize)> {
    match it {
      PrefixIter::Uint(u) => for_uint!(self, p => p.iter_seek(u, target)),
      PrefixIter::Trie(cur) => {
        let Prefix::Trie(p) = self else { unreachable!() };
        p.iter_seek(cur, target)
      }
    }
  }

  /// Advance past a candidate whose suffix band rejected the target.
  /// 越过后缀带否决了目标的候选。
  pub fn iter_seek_next(
    &self,
    it: &mut PrefixIter<'_, 'a>,
    id: usize,
    count: usize,
    target: &[u8],
  ) -> Option<(usize, usize)> {
    match it {
      PrefixIter::Uint(u) => for_uint!(self, p => p.iter_seek_next(u, id, count)),
      PrefixIter::Trie(cur) => {
        let Prefix::Trie(p) = self else { unreachable!() };
        let _ = (id, count);
        p.iter_seek_next(cur, target)
      }
    }
  }

  pub fn iter_next(&self, it: &mut PrefixIter<'_, 'a>, id: usize, step: usize) -> Option<usize> {
    match it {
      PrefixIter::Uint(u) => for_uint!(self, p => p.iter_next(u, id, step)),
      PrefixIter::Trie(cur) => {
        let Prefix::Trie(p) = self else { unreachable!() };
        p.iter_next(cur, step)
      }
    }
  }

  pub fn iter_prev(&self, it: &mut PrefixIter<'_, 'a>, id: usize) -> Option<usize> {
    match it {
      PrefixIter::Uint(u) => for_uint!(self, p => p.iter_prev(u, id)),
      PrefixIter::Trie(cur) => {
        let Prefix::Trie(p) = self else { unreachable!() };
        p.iter_prev(cur)
      }
    }
  }

  /// Head bytes at the cursor.
  /// 游标处的头字节。
  pub fn iter_get_key<'k>(&self, it: &'k PrefixIter<'_, 'a>) -> &'k [u8] {
    match it {
      PrefixIter::Uint(u) => &u.buf[..u.len],
      PrefixIter::Trie(cur) => cur.word(),
    }
  }

  /// Dictionary rank at the cursor; `None` means past the end.
  /// 游标处的字典秩；`None` 表示已越过末尾。
  pub fn iter_dict_rank(&self, it: &PrefixIter<'_, 'a>, id: Option<usize>) -> usize {
    let Some(id) = id else {
      return self.key_count();
    };
    match it {
      PrefixIter::Uint(_) => id,
      PrefixIter::Trie(cur) => {
        let _ = id;
        cur.dict_rank()
      }
    }
  }

  /// Serialize as an 8-aligned wire section; returns bytes written.
  /// 序列化为 8 字节对齐的线上段；返回写出字节数。
  pub fn save(&self, w: &mut impl Write) -> Result<usize> {
    if let Prefix::Trie(p) = self {
      return Ok(p.trie.save(w)?);
    }
    let head = for_uint!(self, p => UintHead {
      key_length: (p.key_length as u64).into(),
      min_value: p.min_value.into(),
      max_value: p.max_value.into(),
    });
    w.write_all(head.as_bytes())?;
    let n = for_uint!(self, p => p.rs.save(w)?);
    Ok(UintHead::SIZE + n)
  }

  /// Zero-copy load of the given kind.
  /// 按指定种类零拷贝加载。
  pub fn load(kind: PrefixKind, mem: &[u8]) -> Result<(Prefix<'_>, usize)> {
    if kind == PrefixKind::Trie {
      let (trie, n) = Trie::load(mem)?;
      return Ok((Prefix::Trie(TriePrefix { trie }), n));
    }
    let (head, rest) = wire::take_head::<UintHead>(mem).map_err(Error::Section)?;
    let key_length = head.key_length.get() as usize;
    let min_value = head.min_value.get();
    let max_value = head.max_value.get();
    if key_length == 0 || key_length > 8 {
      return Err(Error::Corrupt("uint prefix key length"));
    }

    macro_rules! load_asc {
      ($variant:ident, $rs:ty) => {{
        let (rs, n) = <$rs>::load(rest)?;
        (
          Prefix::$variant(AscendingUintPrefix { rs, key_length, min_value, max_value }),
          UintHead::SIZE + n,
        )
      }};
    }
    macro_rules! load_nd {
      ($variant:ident, $rs:ty) => {{
        let (rs, n) = <$rs>::load(rest)?;
        (
          Prefix::$variant(NonDescendingUintPrefix { rs, key_length, min_value, max_value }),
          UintHead::SIZE + n,
        )
      }};
    }

    Ok(match kind {
      PrefixKind::AscAllOne => load_asc!(AscAllOne, AllOne),
      PrefixKind::AscIl256 => load_asc!(AscIl256, Il256),
      PrefixKind::AscSe512 => load_asc!(AscSe512, Se512),
      PrefixKind::AscFewZero32 => load_asc!(AscFewZero32, FewZero<u32>),
      PrefixKind::AscFewZero64 => load_asc!(AscFewZero64, FewZero<u64>),
      PrefixKind::AscFewOne32 => load_asc!(AscFewOne32, FewOne<u32>),
      PrefixKind::AscFewOne64 => load_asc!(AscFewOne64, FewOne<u64>),
      PrefixKind::NdIl256 => load_nd!(NdIl256, Il256),
      PrefixKind::NdSe512 => load_nd!(NdSe512, Se512),
      PrefixKind::NdFewOne32 => load_nd!(NdFewOne32, FewOne<u32>),
      PrefixKind::NdFewOne64 => load_nd!(NdFewOne64, FewOne<u64>),
      PrefixKind::Trie => unreachable!(),
    })
  }
}

impl std::fmt::Debug for Prefix<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Prefix")
      .field("kind", &self.kind())
      .field("keys", &self.key_count())
      .finish()
  }
}
